//! Job-fatal errors.
//!
//! Per-item failures are not errors here: they are `Outcome::failure` and only
//! move the failed counter. `JobError` means the run as a whole cannot go on.

use crate::app::pool::PoolError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Work items could not be collected (e.g. the target system is unreachable).
    #[error("failed to load work items: {0}")]
    Load(String),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl JobError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }
}
