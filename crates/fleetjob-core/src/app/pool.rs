//! WorkerPool - work item を固定数の worker で処理する
//!
//! - worker 数は `JobConfig::worker_count`（ただし item 数より多くは起動しない）
//! - item は共有の pool から早い者勝ちで取り出す（順序保証なし）
//! - 失敗は metrics に記録して続行、pool 全体は止めない
//! - cancel されたら各 worker は次の item を取らずに抜ける
//! - 取り残された item があれば `join` はエラー（黙って成功にはしない）

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use crate::context::JobContext;
use crate::domain::{JobConfig, OutcomeKind};
use crate::metrics::MetricsCollector;
use crate::trace::TraceRegistry;
use crate::typed::Job;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("run cancelled with {remaining} work item(s) not attempted")]
    Cancelled { remaining: usize },

    /// Items were left behind without any cancellation, e.g. no worker was started.
    #[error("{remaining} work item(s) never attempted: no worker was left to take them")]
    Stranded { remaining: usize },

    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
}

type SharedItems<T> = Arc<Mutex<VecDeque<T>>>;

/// Handle to a running set of workers for one job run.
pub struct WorkerPool<T> {
    items: SharedItems<T>,
    joins: Vec<JoinHandle<()>>,
    ctx: JobContext,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Spawn the workers. They start pulling items immediately.
    ///
    /// Each worker's context is tagged with `worker=<id>` through `trace`.
    pub fn spawn<J>(
        job: Arc<J>,
        trace: &Arc<TraceRegistry>,
        ctx: &JobContext,
        config: &JobConfig,
        items: Vec<T>,
        metrics: Arc<MetricsCollector>,
    ) -> Self
    where
        J: Job<Item = T>,
    {
        let workers = config.worker_count.min(items.len());
        if workers == 0 && !items.is_empty() {
            tracing::warn!(
                job = job.name(),
                items = items.len(),
                worker_count = config.worker_count,
                "no workers to spawn"
            );
        }
        let items: SharedItems<T> = Arc::new(Mutex::new(VecDeque::from(items)));

        tracing::debug!(
            job = job.name(),
            workers,
            dry_run = config.dry_run,
            "spawning workers"
        );

        let mut joins = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let job = Arc::clone(&job);
            let items = Arc::clone(&items);
            let metrics = Arc::clone(&metrics);
            let trace = Arc::clone(trace);
            let ctx = trace.add(ctx, "worker", worker_id.to_string());
            let config = config.clone();

            let join = tokio::spawn(async move {
                worker_loop(job, trace, ctx, config, items, metrics).await;
            });
            joins.push(join);
        }

        Self {
            items,
            joins,
            ctx: ctx.clone(),
        }
    }

    /// Wait for every worker to finish.
    ///
    /// All workers are joined even if one of them panicked. Items still in the
    /// pool afterwards make the run fail: `Cancelled` when the context was
    /// cancelled, `Stranded` otherwise.
    pub async fn join(self) -> Result<(), PoolError> {
        let mut panicked = None;
        for join in self.joins {
            if let Err(e) = join.await {
                panicked.get_or_insert_with(|| e.to_string());
            }
        }
        if let Some(msg) = panicked {
            return Err(PoolError::WorkerPanicked(msg));
        }

        let remaining = lock(&self.items).len();
        match remaining {
            0 => Ok(()),
            _ if self.ctx.is_cancelled() => Err(PoolError::Cancelled { remaining }),
            _ => Err(PoolError::Stranded { remaining }),
        }
    }
}

fn lock<T>(items: &Mutex<VecDeque<T>>) -> std::sync::MutexGuard<'_, VecDeque<T>> {
    items.lock().unwrap_or_else(PoisonError::into_inner)
}

// ロックは pop の間だけ。await を跨がない
fn next_item<T>(items: &Mutex<VecDeque<T>>) -> Option<T> {
    lock(items).pop_front()
}

async fn worker_loop<J: Job>(
    job: Arc<J>,
    trace: Arc<TraceRegistry>,
    ctx: JobContext,
    config: JobConfig,
    items: SharedItems<J::Item>,
    metrics: Arc<MetricsCollector>,
) {
    let logger = trace.logger(&ctx);
    loop {
        if ctx.is_cancelled() {
            logger.debug("context cancelled, worker stopping");
            break;
        }
        let Some(item) = next_item(&items) else {
            break;
        };

        let label = format!("{item:?}");
        let outcome = job.process(&ctx, &config, item).await;
        match outcome.kind {
            OutcomeKind::Success => {
                metrics.inc_task_success();
                logger.debug(&format!("task {label} succeeded"));
            }
            OutcomeKind::Failure => {
                metrics.inc_task_failed();
                let reason = outcome.reason.as_deref().unwrap_or("no reason given");
                logger.warn(&format!("task {label} failed: {reason}"));
            }
        }
    }
}
