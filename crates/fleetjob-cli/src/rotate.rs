//! rotate-credential: デモ用の job
//!
//! Rotates a credential across an in-memory fleet. Nothing leaves the process;
//! the point is to show a `Job` that respects dry-run and cancellation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use fleetjob_core::{Job, JobConfig, JobContext, JobError, Outcome};
use serde::Deserialize;

const FLEET: &str = r#"[
    { "name": "cluster-us-east-1", "reachable": true },
    { "name": "cluster-us-west-2", "reachable": true },
    { "name": "cluster-eu-central-1", "reachable": false },
    { "name": "cluster-ap-south-1", "reachable": true },
    { "name": "cluster-sa-east-1", "reachable": true }
]"#;

const ROTATE_LATENCY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub name: String,
    pub reachable: bool,
}

pub struct RotateCredentialJob {
    fleet: Vec<Target>,
    // target name -> credential version
    versions: Mutex<HashMap<String, u32>>,
}

impl RotateCredentialJob {
    pub fn new(fleet: Vec<Target>) -> Self {
        let versions = fleet.iter().map(|t| (t.name.clone(), 1)).collect();
        Self {
            fleet,
            versions: Mutex::new(versions),
        }
    }

    pub fn demo() -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(FLEET)?))
    }

    fn version(&self, target: &str) -> Option<u32> {
        let versions = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
        versions.get(target).copied()
    }

    fn bump(&self, target: &str) -> Option<u32> {
        let mut versions = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
        versions.get_mut(target).map(|v| {
            *v += 1;
            *v
        })
    }
}

#[async_trait]
impl Job for RotateCredentialJob {
    type Item = Target;

    fn name(&self) -> &str {
        "rotate-credential"
    }

    fn about(&self) -> &str {
        "Rotate the fleet credential on every target"
    }

    async fn load(&self, _ctx: &JobContext, _config: &JobConfig) -> Result<Vec<Target>, JobError> {
        if self.fleet.is_empty() {
            return Err(JobError::load("fleet inventory is empty"));
        }
        Ok(self.fleet.clone())
    }

    async fn process(&self, ctx: &JobContext, config: &JobConfig, target: Target) -> Outcome {
        // 到達性チェックは read-only なので dry-run でも行う
        if !target.reachable {
            return Outcome::failure(format!("{} is unreachable", target.name));
        }
        let Some(current) = self.version(&target.name) else {
            return Outcome::failure(format!("{} has no credential", target.name));
        };

        if config.dry_run {
            tracing::info!(
                cluster = %target.name,
                current,
                next = current + 1,
                "would rotate credential"
            );
            return Outcome::success();
        }

        tokio::select! {
            _ = ctx.cancelled() => {
                return Outcome::failure(format!("{}: cancelled before rotation", target.name));
            }
            _ = tokio::time::sleep(ROTATE_LATENCY) => {}
        }

        match self.bump(&target.name) {
            Some(version) => {
                tracing::info!(cluster = %target.name, version, "rotated credential");
                Outcome::success()
            }
            None => Outcome::failure(format!("{} disappeared during rotation", target.name)),
        }
    }
}
