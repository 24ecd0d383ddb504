//! Domain model: run configuration, outcomes, identifiers, job-fatal errors.

pub mod config;
pub mod errors;
pub mod ids;
pub mod outcome;

pub use self::config::{ConfigError, JobConfig};
pub use self::errors::JobError;
pub use self::ids::RunId;
pub use self::outcome::{Outcome, OutcomeKind};
