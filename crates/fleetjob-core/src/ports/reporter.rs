//! MetricsReporter port - 集計結果の出力先

use crate::metrics::MetricsCollector;

/// Emits the metrics collected during one job run.
///
/// Implementations read `MetricsCollector::snapshot()` and must not mutate the
/// collector. Calling `report` twice is allowed.
pub trait MetricsReporter: Send + Sync {
    fn report(&self, collector: &MetricsCollector);
}
