mod rotate;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::bail;
use fleetjob_core::impls::{JsonReporter, LogReporter};
use fleetjob_core::observability::{self, LogFormat};
use fleetjob_core::ports::MetricsReporter;
use fleetjob_core::{CommandBuilder, CommandError, JobContext};

use crate::rotate::RotateCredentialJob;

/// `log` (default) or `json`.
const METRICS_ENV: &str = "FLEETJOB_METRICS";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    observability::init(LogFormat::from_env()?);

    // Ctrl-C で cancel。worker は処理中の item を終えてから止まる
    let (ctx, cancel) = JobContext::background().with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing in-flight items");
            cancel.cancel();
        }
    });

    let cmd = CommandBuilder::new("fleetjob")
        .about("Fleet maintenance batch jobs")
        .version(env!("CARGO_PKG_VERSION"))
        .context(ctx)
        .reporter(reporter_for(std::env::var(METRICS_ENV).ok().as_deref())?)
        .register(RotateCredentialJob::demo()?)?
        .build()?;

    match cmd.run().await {
        Ok(summary) => {
            tracing::debug!(summary = %serde_json::to_string(&summary)?, "run finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(CommandError::Args(e)) => {
            // --help / --version もここに来る（exit code 0）
            e.print()?;
            Ok(exit_code(e.exit_code()))
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(exit_code(e.exit_code()))
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn reporter_for(value: Option<&str>) -> anyhow::Result<Arc<dyn MetricsReporter>> {
    match value.map(str::trim) {
        None | Some("") | Some("log") => Ok(Arc::new(LogReporter::new())),
        Some("json") => Ok(Arc::new(JsonReporter::stdout())),
        Some(other) => bail!("unknown {METRICS_ENV} value '{other}' (expected 'log' or 'json')"),
    }
}
