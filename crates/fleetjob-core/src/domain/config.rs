//! JobConfig - 実行ごとの設定（dry-run, worker 数）
//!
//! CLI の flag と 1:1 で対応します。`add_flags()` で subcommand に flag を生やし、
//! parse 後に `bind()` で値を上書きします。

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde::{Deserialize, Serialize};

pub const DRY_RUN_FLAG: &str = "dry-run";
pub const WORKER_COUNT_FLAG: &str = "worker-count";

/// Configuration options for one job execution.
///
/// Defaults are fail-safe: a bare invocation simulates with a single worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub dry_run: bool,
    pub worker_count: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            worker_count: 1,
        }
    }
}

impl JobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `--dry-run` and `--worker-count` on `cmd`.
    ///
    /// The current field values become the flag defaults, so binding a parse
    /// result without those flags leaves the config unchanged.
    pub fn add_flags(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(DRY_RUN_FLAG)
                .long(DRY_RUN_FLAG)
                .help("Show what would be changed by a run of this job.")
                .value_parser(value_parser!(bool))
                .num_args(0..=1)
                .require_equals(true)
                .default_value(if self.dry_run { "true" } else { "false" })
                .default_missing_value("true")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(WORKER_COUNT_FLAG)
                .long(WORKER_COUNT_FLAG)
                .help("Number of concurrent workers.")
                .value_parser(value_parser!(usize))
                .default_value(self.worker_count.to_string())
                .action(ArgAction::Set),
        )
    }

    /// Overwrite fields with the values parsed for this subcommand.
    pub fn bind(&mut self, matches: &ArgMatches) {
        if let Some(dry_run) = matches.get_one::<bool>(DRY_RUN_FLAG) {
            self.dry_run = *dry_run;
        }
        if let Some(worker_count) = matches.get_one::<usize>(WORKER_COUNT_FLAG) {
            self.worker_count = *worker_count;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count < 1 {
            return Err(ConfigError::InvalidWorkerCount(self.worker_count));
        }
        Ok(())
    }
}
