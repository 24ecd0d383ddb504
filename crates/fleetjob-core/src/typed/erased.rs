//! DynJob - object-safe な Job
//!
//! `Job` has an associated `Item` type, so it cannot be stored as a trait object.
//! `TypedJob<J>` erases it: the registry holds `Arc<dyn DynJob>` and the item
//! type only lives inside `run`.

use std::sync::Arc;

use async_trait::async_trait;

use super::job::Job;
use crate::app::pool::WorkerPool;
use crate::context::JobContext;
use crate::domain::{JobConfig, JobError};
use crate::metrics::MetricsCollector;
use crate::trace::TraceRegistry;

#[async_trait]
pub trait DynJob: Send + Sync {
    fn name(&self) -> &str;

    fn about(&self) -> &str;

    /// Load the work items and drive them through a worker pool.
    ///
    /// Returns the populated collector once every worker has finished.
    /// Worker tags go through `trace`.
    async fn run(
        &self,
        trace: &Arc<TraceRegistry>,
        ctx: &JobContext,
        config: &JobConfig,
    ) -> Result<Arc<MetricsCollector>, JobError>;
}

pub struct TypedJob<J: Job> {
    job: Arc<J>,
}

impl<J: Job> TypedJob<J> {
    pub fn new(job: J) -> Self {
        Self { job: Arc::new(job) }
    }
}

#[async_trait]
impl<J: Job> DynJob for TypedJob<J> {
    fn name(&self) -> &str {
        self.job.name()
    }

    fn about(&self) -> &str {
        self.job.about()
    }

    async fn run(
        &self,
        trace: &Arc<TraceRegistry>,
        ctx: &JobContext,
        config: &JobConfig,
    ) -> Result<Arc<MetricsCollector>, JobError> {
        let items = self.job.load(ctx, config).await?;

        let mut metrics = MetricsCollector::new(self.job.name());
        metrics.set_task_total(items.len() as u64);
        let metrics = Arc::new(metrics);

        WorkerPool::spawn(
            Arc::clone(&self.job),
            trace,
            ctx,
            config,
            items,
            Arc::clone(&metrics),
        )
        .join()
        .await?;

        Ok(metrics)
    }
}
