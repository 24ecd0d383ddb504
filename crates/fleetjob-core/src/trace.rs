//! Trace context registration.
//!
//! Tagging a context with a key also registers, on first sight of that key, a
//! log-enrichment callback that reads the key back out of whatever context the
//! logger is given. Callers never register callbacks themselves.
//!
//! The command layer and the worker pool tag through the registry they were
//! built with, so a test can hand them its own registry instead of the global one.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::context::JobContext;
use crate::impls::{ContextLogger, LogEnricher};
use crate::ports::{EnrichmentSink, ExtraDataCallback};

/// Keys seen so far plus the sink their callbacks went to.
pub struct TraceRegistry {
    seen: Mutex<HashSet<String>>,
    sink: Arc<dyn EnrichmentSink>,
}

impl TraceRegistry {
    pub fn new(sink: Arc<dyn EnrichmentSink>) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            sink,
        }
    }

    /// Process-wide registry backed by [`LogEnricher::shared`].
    pub fn global() -> Arc<TraceRegistry> {
        static GLOBAL: OnceLock<Arc<TraceRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(TraceRegistry::new(LogEnricher::shared())))
            .clone()
    }

    /// Return a child of `ctx` carrying `value` under `key`.
    ///
    /// The membership check and the callback registration happen under one lock,
    /// so each key reaches the sink exactly once even under concurrent calls.
    pub fn add(&self, ctx: &JobContext, key: &str, value: impl Into<String>) -> JobContext {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.insert(key.to_string()) {
            let lookup = key.to_string();
            let callback: ExtraDataCallback =
                Arc::new(move |ctx: &JobContext| ctx.value(&lookup).map(str::to_owned));
            self.sink.register_extra_data_callback(key, callback);
        }
        ctx.with_value(key, value)
    }

    /// Logger that renders `ctx` through this registry's sink.
    pub fn logger<'a>(&self, ctx: &'a JobContext) -> ContextLogger<'a> {
        ContextLogger::new(ctx, Arc::clone(&self.sink))
    }

    pub fn registered_keys(&self) -> Vec<String> {
        let seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = seen.iter().cloned().collect();
        keys.sort();
        keys
    }
}

/// [`TraceRegistry::add`] on the global registry.
pub fn add_trace_context(ctx: &JobContext, key: &str, value: impl Into<String>) -> JobContext {
    TraceRegistry::global().add(ctx, key, value)
}
