//! Per-run task counters.
//!
//! Success/failure increments and `snapshot()` share one lock, so a snapshot is
//! always a state that existed at a single instant. The total is set once,
//! before the collector is shared with workers (`&mut self`).

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Default)]
struct Counters {
    success: u64,
    failed: u64,
}

#[derive(Debug)]
pub struct MetricsCollector {
    job_name: String,
    task_total: u64,
    counters: Mutex<Counters>,
}

/// Point-in-time copy of a [`MetricsCollector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub job_name: String,
    pub task_total: u64,
    pub task_success: u64,
    pub task_failed: u64,
}

impl MetricsCollector {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            task_total: 0,
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn set_task_total(&mut self, total: u64) {
        self.task_total = total;
    }

    pub fn inc_task_success(&self) {
        self.counters().success += 1;
    }

    pub fn inc_task_failed(&self) {
        self.counters().failed += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.counters();
        MetricsSnapshot {
            job_name: self.job_name.clone(),
            task_total: self.task_total,
            task_success: counters.success,
            task_failed: counters.failed,
        }
    }

    // counting never fails: a poisoned lock still holds valid integers
    fn counters(&self) -> std::sync::MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetricsSnapshot {
    /// Tasks that were never attempted (e.g. the run was cancelled).
    pub fn task_skipped(&self) -> u64 {
        self.task_total.saturating_sub(self.task_success + self.task_failed)
    }
}
