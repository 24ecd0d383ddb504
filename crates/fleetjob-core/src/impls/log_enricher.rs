//! LogEnricher - tracing に載せる extra data の callback 置き場
//!
//! `TraceRegistry` が key ごとに 1 回だけ callback を登録し、
//! `ContextLogger` がログを書くたびに全 callback を context に対して評価します。

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::context::JobContext;
use crate::ports::{EnrichmentSink, ExtraDataCallback};

#[derive(Default)]
pub struct LogEnricher {
    callbacks: RwLock<BTreeMap<String, ExtraDataCallback>>,
}

impl LogEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide enricher used by the global trace registry.
    pub fn shared() -> Arc<LogEnricher> {
        static SHARED: OnceLock<Arc<LogEnricher>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(LogEnricher::new())).clone()
    }

    /// Evaluate every callback against `ctx`, keeping the keys that have a value.
    pub fn extra_data(&self, ctx: &JobContext) -> Vec<(String, String)> {
        let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
        callbacks
            .iter()
            .filter_map(|(key, cb)| cb(ctx).map(|value| (key.clone(), value)))
            .collect()
    }
}

impl EnrichmentSink for LogEnricher {
    // 同じ key の再登録は上書き（TraceRegistry 経由なら起きない）
    fn register_extra_data_callback(&self, key: &str, callback: ExtraDataCallback) {
        let mut callbacks = self.callbacks.write().unwrap_or_else(PoisonError::into_inner);
        callbacks.insert(key.to_string(), callback);
    }

    // key 順にソート済み（BTreeMap）
    fn render(&self, ctx: &JobContext) -> String {
        self.extra_data(ctx)
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Writes tracing events enriched with the trace values of one context.
///
/// Usually obtained from [`TraceRegistry::logger`](crate::trace::TraceRegistry::logger).
pub struct ContextLogger<'a> {
    ctx: &'a JobContext,
    sink: Arc<dyn EnrichmentSink>,
}

impl<'a> ContextLogger<'a> {
    pub fn new(ctx: &'a JobContext, sink: Arc<dyn EnrichmentSink>) -> Self {
        Self { ctx, sink }
    }

    pub fn fields(&self) -> String {
        self.sink.render(self.ctx)
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(trace = %self.fields(), "{message}");
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(trace = %self.fields(), "{message}");
    }
}
