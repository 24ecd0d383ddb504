//! CommandBuilder - context と registry から CLI の command tree を組み立てる
//!
//! # Fail-fast 設計
//! - 重複した job 名は `register()` の時点で `RegistryError`
//! - job が 1 つもなければ `build()` が `BuildError::NoJobs`
//! どちらも subcommand が実行される前に検出されます。

use std::sync::Arc;

use clap::Command;

use super::command::JobCommand;
use crate::context::JobContext;
use crate::domain::JobConfig;
use crate::impls::LogReporter;
use crate::ports::{Clock, MetricsReporter, SystemClock};
use crate::trace::TraceRegistry;
use crate::typed::{Job, JobRegistry, RegistryError};

/// Builds a [`JobCommand`] with one subcommand per registered job.
///
/// # 使用例
/// ```ignore
/// let mut registry = JobRegistry::new();
/// registry.add_job(PullSecretJob::new())?;
///
/// let cmd = CommandBuilder::new("fleetjob")
///     .context(ctx)
///     .registry(registry)
///     .build()?;
/// let summary = cmd.run().await?;
/// ```
pub struct CommandBuilder {
    name: String,
    about: Option<String>,
    version: Option<String>,
    ctx: JobContext,
    registry: JobRegistry,
    trace: Arc<TraceRegistry>,
    reporter: Arc<dyn MetricsReporter>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("no jobs registered; nothing to build a command for")]
    NoJobs,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            version: None,
            ctx: JobContext::background(),
            registry: JobRegistry::new(),
            trace: TraceRegistry::global(),
            reporter: Arc::new(LogReporter::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parent context for every run (trace values, cancellation).
    pub fn context(mut self, ctx: JobContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Replace the registry wholesale.
    pub fn registry(mut self, registry: JobRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one more job.
    pub fn register<J: Job>(mut self, job: J) -> Result<Self, RegistryError> {
        self.registry.add_job(job)?;
        Ok(self)
    }

    /// Registry used for the `job` / `run_id` / `worker` tags.
    /// Defaults to [`TraceRegistry::global`].
    pub fn trace_registry(mut self, trace: Arc<TraceRegistry>) -> Self {
        self.trace = trace;
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn MetricsReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Compose the command tree. The registry is frozen from here on.
    pub fn build(self) -> Result<JobCommand, BuildError> {
        if self.registry.is_empty() {
            return Err(BuildError::NoJobs);
        }

        let mut root = Command::new(self.name)
            .subcommand_required(true)
            .arg_required_else_help(true);
        if let Some(about) = self.about {
            root = root.about(about);
        }
        if let Some(version) = self.version {
            root = root.version(version);
        }

        let defaults = JobConfig::default();
        for job in self.registry.iter() {
            let mut sub = Command::new(job.name().to_string());
            if !job.about().is_empty() {
                sub = sub.about(job.about().to_string());
            }
            root = root.subcommand(defaults.add_flags(sub));
        }

        Ok(JobCommand::new(
            root,
            Arc::new(self.registry),
            self.ctx,
            self.trace,
            self.reporter,
            self.clock,
        ))
    }
}
