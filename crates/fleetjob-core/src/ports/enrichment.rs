//! EnrichmentSink port - ログ enrichment の callback 登録先
//!
//! The structured-logging side owns the callbacks; the trace registry only
//! registers them and asks for the rendered fields when it hands out a logger.
//! Tests swap in a recording sink.

use std::sync::Arc;

use crate::context::JobContext;

/// Extracts the value for one key from a context, if present.
pub type ExtraDataCallback = Arc<dyn Fn(&JobContext) -> Option<String> + Send + Sync>;

pub trait EnrichmentSink: Send + Sync {
    fn register_extra_data_callback(&self, key: &str, callback: ExtraDataCallback);

    /// Every registered key that has a value in `ctx`, as `k=v` pairs.
    fn render(&self, ctx: &JobContext) -> String;
}
