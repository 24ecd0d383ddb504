//! Outcome model: the result of processing one work item.
//!
//! Workers only need a binary classification to drive the metrics counters; the
//! optional reason is carried along for logging.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Classification of a single work item attempt.
///
/// Serialized as SCREAMING_SNAKE_CASE: SUCCESS / FAILURE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Result of one work item.
///
/// - `SUCCESS`: the item was handled (or, under dry-run, would have been).
/// - `FAILURE`: the item could not be handled; the run keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            kind: OutcomeKind::Success,
            reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failure,
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

impl<E: Display> From<Result<(), E>> for Outcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Outcome::success(),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}
