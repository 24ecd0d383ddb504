//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **LogEnricher / ContextLogger**: tracing への enrichment
//! - **LogReporter**: メトリクスを INFO ログに出す（デフォルト）
//! - **JsonReporter**: メトリクスを JSON 1 行で書く

pub mod json_reporter;
pub mod log_enricher;
pub mod log_reporter;

pub use self::json_reporter::JsonReporter;
pub use self::log_enricher::{ContextLogger, LogEnricher};
pub use self::log_reporter::LogReporter;
