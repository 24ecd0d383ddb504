//! fleetjob-core
//!
//! Building blocks for one-shot batch jobs run from the command line.
//!
//! # モジュール構成
//! - **domain**: JobConfig, Outcome, RunId, JobError
//! - **ports**: 外部 collaborator への interface（EnrichmentSink, MetricsReporter, Clock）
//! - **typed**: Job trait, type erasure（DynJob）, JobRegistry
//! - **app**: CommandBuilder, JobCommand, WorkerPool
//! - **impls**: ports の実装（LogEnricher, LogReporter, JsonReporter）
//! - **context / trace**: 実行コンテキストと trace 値の自己登録
//! - **metrics**: run ごとのタスク集計

pub mod app;
pub mod context;
pub mod domain;
pub mod impls;
pub mod metrics;
pub mod observability;
pub mod ports;
pub mod trace;
pub mod typed;

#[cfg(test)]
mod testing;

pub use self::app::{CommandBuilder, CommandError, JobCommand, RunSummary};
pub use self::context::{CancelHandle, JobContext};
pub use self::domain::{JobConfig, JobError, Outcome};
pub use self::metrics::{MetricsCollector, MetricsSnapshot};
pub use self::trace::{TraceRegistry, add_trace_context};
pub use self::typed::{Job, JobRegistry};
