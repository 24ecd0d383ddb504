//! Job trait - 型付き Job の定義
//!
//! A job names itself, collects its work items, and processes one item at a
//! time. The framework owns everything in between: worker fan-out, outcome
//! counting, and reporting.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::context::JobContext;
use crate::domain::{JobConfig, JobError, Outcome};

/// A named, pluggable unit of batch work.
///
/// # 使用例
/// ```ignore
/// struct RotateJob;
///
/// #[async_trait]
/// impl Job for RotateJob {
///     type Item = String;
///
///     fn name(&self) -> &str {
///         "rotate"
///     }
///
///     async fn load(
///         &self,
///         _ctx: &JobContext,
///         _config: &JobConfig,
///     ) -> Result<Vec<String>, JobError> {
///         Ok(vec!["cluster-a".into(), "cluster-b".into()])
///     }
///
///     async fn process(&self, _ctx: &JobContext, config: &JobConfig, target: String) -> Outcome {
///         if config.dry_run {
///             tracing::info!(%target, "would rotate");
///             return Outcome::success();
///         }
///         rotate(&target).await.into()
///     }
/// }
/// ```
///
/// # Dry-run
/// `process` sees the same `JobConfig` as `load`. With `dry_run == true` it must
/// not mutate anything external, but should still return the outcome the real
/// run would have produced so the metrics stay meaningful.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    type Item: Debug + Send + 'static;

    /// Unique name; also the CLI subcommand.
    fn name(&self) -> &str;

    /// One-line help for the subcommand.
    fn about(&self) -> &str {
        ""
    }

    /// Collect the work items for this run. An error here aborts the run.
    async fn load(&self, ctx: &JobContext, config: &JobConfig)
    -> Result<Vec<Self::Item>, JobError>;

    /// Process one work item. Called from any worker, once per item.
    async fn process(&self, ctx: &JobContext, config: &JobConfig, item: Self::Item) -> Outcome;
}
