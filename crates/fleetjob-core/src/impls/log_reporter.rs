//! LogReporter - メトリクスを構造化ログ（INFO）に 1 行で出す

use crate::metrics::MetricsCollector;
use crate::ports::MetricsReporter;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsReporter for LogReporter {
    fn report(&self, collector: &MetricsCollector) {
        // snapshot で一貫した値を取る
        let snapshot = collector.snapshot();
        tracing::info!(
            job = %snapshot.job_name,
            task_total = snapshot.task_total,
            task_success = snapshot.task_success,
            task_failed = snapshot.task_failed,
            "Printing metrics"
        );
    }
}
