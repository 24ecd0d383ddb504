//! JobCommand - parse → config → run → report

use std::ffi::OsString;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{ArgMatches, Command};
use serde::Serialize;

use crate::context::JobContext;
use crate::domain::{ConfigError, JobConfig, JobError, RunId};
use crate::metrics::MetricsSnapshot;
use crate::ports::{Clock, MetricsReporter};
use crate::trace::TraceRegistry;
use crate::typed::{DynJob, JobRegistry};

/// Exit code for usage / configuration errors (clap's convention).
pub const EXIT_USAGE: i32 = 2;
/// Exit code when the job itself fails.
pub const EXIT_JOB_FAILED: i32 = 1;

/// Executable command tree produced by [`CommandBuilder`](super::CommandBuilder).
pub struct JobCommand {
    command: Command,
    registry: Arc<JobRegistry>,
    ctx: JobContext,
    trace: Arc<TraceRegistry>,
    reporter: Arc<dyn MetricsReporter>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("invalid job configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown job '{0}'")]
    UnknownJob(String),

    #[error("job '{job}' failed: {source}")]
    Job {
        job: String,
        #[source]
        source: JobError,
    },
}

impl CommandError {
    /// Process exit code for this error.
    ///
    /// `--help` / `--version` surface as clap errors with exit code 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Args(e) => e.exit_code(),
            CommandError::Config(_) | CommandError::UnknownJob(_) => EXIT_USAGE,
            CommandError::Job { .. } => EXIT_JOB_FAILED,
        }
    }
}

/// What a successful run looked like.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub job_name: String,
    pub config: JobConfig,
    pub snapshot: MetricsSnapshot,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobCommand {
    pub(crate) fn new(
        command: Command,
        registry: Arc<JobRegistry>,
        ctx: JobContext,
        trace: Arc<TraceRegistry>,
        reporter: Arc<dyn MetricsReporter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            command,
            registry,
            ctx,
            trace,
            reporter,
            clock,
        }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn job_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Run with the process arguments.
    pub async fn run(&self) -> Result<RunSummary, CommandError> {
        self.run_from(std::env::args_os()).await
    }

    /// Run with explicit arguments; the first one is the binary name.
    pub async fn run_from<I, T>(&self, args: I) -> Result<RunSummary, CommandError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args)?;
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| CommandError::UnknownJob(String::new()))?;
        let job = self
            .registry
            .get(name)
            .ok_or_else(|| CommandError::UnknownJob(name.to_string()))?;

        let config = bind_config(sub_matches)?;
        self.execute(job, config).await
    }

    async fn execute(
        &self,
        job: Arc<dyn DynJob>,
        config: JobConfig,
    ) -> Result<RunSummary, CommandError> {
        let job_name = job.name().to_string();
        let run_id = RunId::generate(self.clock.as_ref());

        let ctx = self.trace.add(&self.ctx, "job", job_name.as_str());
        let ctx = self.trace.add(&ctx, "run_id", run_id.to_string());

        tracing::info!(
            job = %job_name,
            %run_id,
            dry_run = config.dry_run,
            worker_count = config.worker_count,
            "starting job"
        );
        let started_at = self.clock.now();

        let metrics = match job.run(&self.trace, &ctx, &config).await {
            Ok(metrics) => metrics,
            Err(source) => {
                tracing::error!(job = %job_name, %run_id, error = %source, "job failed");
                return Err(CommandError::Job {
                    job: job_name,
                    source,
                });
            }
        };

        self.reporter.report(&metrics);
        let finished_at = self.clock.now();

        Ok(RunSummary {
            run_id,
            job_name,
            config,
            snapshot: metrics.snapshot(),
            started_at,
            finished_at,
        })
    }
}

// 毎回 default から組み立てて、flag の値で上書き
fn bind_config(matches: &ArgMatches) -> Result<JobConfig, ConfigError> {
    let mut config = JobConfig::new();
    config.bind(matches);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CommandBuilder;
    use crate::metrics::MetricsCollector;
    use crate::ports::FixedClock;
    use crate::testing::{NoopJob, ScriptedJob, local_trace};
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReporter {
        reports: Mutex<Vec<MetricsSnapshot>>,
    }

    impl MetricsReporter for RecordingReporter {
        fn report(&self, collector: &MetricsCollector) {
            self.reports.lock().unwrap().push(collector.snapshot());
        }
    }

    fn build(job: ScriptedJob, reporter: Arc<RecordingReporter>) -> JobCommand {
        CommandBuilder::new("fleetjob")
            .trace_registry(local_trace())
            .register(job)
            .unwrap()
            .reporter(reporter)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn run_binds_flags_and_reports_once() {
        let job = ScriptedJob::new("rotate", vec![true, false, true]);
        let configs = job.configs();
        let reporter = Arc::new(RecordingReporter::default());
        let cmd = build(job, reporter.clone());

        let summary = cmd
            .run_from(["fleetjob", "rotate", "--dry-run=false", "--worker-count=2"])
            .await
            .unwrap();

        assert_eq!(summary.job_name, "rotate");
        assert_eq!(
            summary.config,
            JobConfig {
                dry_run: false,
                worker_count: 2
            }
        );
        assert_eq!(summary.snapshot.task_total, 3);
        assert_eq!(summary.snapshot.task_success, 2);
        assert_eq!(summary.snapshot.task_failed, 1);

        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], summary.snapshot);

        // load() と全 process() が同じ config を見ている
        assert!(configs.lock().unwrap().iter().all(|c| c == &summary.config));
    }

    #[tokio::test]
    async fn defaults_apply_without_flags() {
        let job = ScriptedJob::new("rotate", vec![true]);
        let reporter = Arc::new(RecordingReporter::default());
        let cmd = build(job, reporter);

        let summary = cmd.run_from(["fleetjob", "rotate"]).await.unwrap();
        assert_eq!(summary.config, JobConfig::default());
    }

    #[tokio::test]
    async fn zero_workers_is_a_config_error_and_job_never_runs() {
        let job = ScriptedJob::new("rotate", vec![true]);
        let configs = job.configs();
        let reporter = Arc::new(RecordingReporter::default());
        let cmd = build(job, reporter.clone());

        let err = cmd
            .run_from(["fleetjob", "rotate", "--worker-count=0"])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::Config(ConfigError::InvalidWorkerCount(0))
        ));
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(configs.lock().unwrap().is_empty());
        assert!(reporter.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn job_fatal_error_propagates_without_report() {
        let job = ScriptedJob::new("rotate", vec![true]).failing_load("api unreachable");
        let reporter = Arc::new(RecordingReporter::default());
        let cmd = build(job, reporter.clone());

        let err = cmd.run_from(["fleetjob", "rotate"]).await.unwrap_err();

        assert!(matches!(
            &err,
            CommandError::Job { job, source: JobError::Load(_) } if job == "rotate"
        ));
        assert_eq!(err.exit_code(), EXIT_JOB_FAILED);
        assert!(reporter.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn task_failures_still_exit_cleanly() {
        let job = ScriptedJob::new("rotate", vec![false, false]);
        let cmd = build(job, Arc::new(RecordingReporter::default()));

        let summary = cmd.run_from(["fleetjob", "rotate"]).await.unwrap();
        assert_eq!(summary.snapshot.task_failed, 2);
    }

    #[tokio::test]
    async fn argument_errors_use_clap_exit_codes() {
        let cmd = CommandBuilder::new("fleetjob")
            .trace_registry(local_trace())
            .register(NoopJob::new("rotate"))
            .unwrap()
            .build()
            .unwrap();

        let unknown = cmd.run_from(["fleetjob", "nope"]).await.unwrap_err();
        assert!(matches!(unknown, CommandError::Args(_)));
        assert_eq!(unknown.exit_code(), 2);

        let bad_value = cmd
            .run_from(["fleetjob", "rotate", "--worker-count=-3"])
            .await
            .unwrap_err();
        assert_eq!(bad_value.exit_code(), 2);

        let help = cmd.run_from(["fleetjob", "--help"]).await.unwrap_err();
        assert_eq!(help.exit_code(), 0);
    }

    #[tokio::test]
    async fn summary_uses_command_clock() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let cmd = CommandBuilder::new("fleetjob")
            .trace_registry(local_trace())
            .register(NoopJob::new("rotate"))
            .unwrap()
            .clock(Arc::new(FixedClock::new(at)))
            .reporter(Arc::new(RecordingReporter::default()))
            .build()
            .unwrap();

        let summary = cmd.run_from(["fleetjob", "rotate"]).await.unwrap();

        assert_eq!(summary.started_at, at);
        assert_eq!(summary.finished_at, at);
        assert_eq!(
            summary.run_id.as_ulid().timestamp_ms(),
            at.timestamp_millis() as u64
        );
    }

    #[tokio::test]
    async fn run_context_carries_job_and_run_id() {
        let job = ScriptedJob::new("rotate", vec![true]);
        let seen = job.contexts();
        let cmd = build(job, Arc::new(RecordingReporter::default()));

        let summary = cmd.run_from(["fleetjob", "rotate"]).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let values = &seen[0];
        assert_eq!(values.get("job").map(String::as_str), Some("rotate"));
        assert_eq!(
            values.get("run_id").cloned(),
            Some(summary.run_id.to_string())
        );
        assert_eq!(values.get("worker").map(String::as_str), Some("0"));
    }

    #[tokio::test]
    async fn framework_tags_go_to_the_configured_registry() {
        let trace = local_trace();
        let cmd = CommandBuilder::new("fleetjob")
            .trace_registry(Arc::clone(&trace))
            .register(ScriptedJob::new("rotate", vec![true]))
            .unwrap()
            .reporter(Arc::new(RecordingReporter::default()))
            .build()
            .unwrap();

        cmd.run_from(["fleetjob", "rotate"]).await.unwrap();

        assert_eq!(trace.registered_keys(), vec!["job", "run_id", "worker"]);
    }
}
