//! JsonReporter - snapshot を JSON 1 行で writer に書く
//!
//! 機械可読なサマリが欲しいとき用。書き込み失敗は warn ログのみで run は失敗させない。

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::ports::MetricsReporter;

pub struct JsonReporter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JsonReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> MetricsReporter for JsonReporter<W> {
    fn report(&self, collector: &MetricsCollector) {
        let snapshot = collector.snapshot();
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = write_line(&mut *out, &snapshot) {
            tracing::warn!(error = %e, job = %snapshot.job_name, "failed to write metrics");
        }
    }
}

fn write_line<W: Write>(out: &mut W, snapshot: &MetricsSnapshot) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, snapshot)?;
    writeln!(out)?;
    out.flush()
}
