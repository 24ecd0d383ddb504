//! JobRegistry - Job の登録と管理
//!
//! 初期化時に組み立て（mutable）、`CommandBuilder::build()` 以降は `Arc` に包んで
//! 読むだけにします。ロック不要。

use std::collections::BTreeMap;
use std::sync::Arc;

use super::erased::{DynJob, TypedJob};
use super::job::Job;

/// Job name -> job.
///
/// Ordered by name so the generated subcommands (and `--help`) are stable.
#[derive(Default)]
pub struct JobRegistry {
    jobs: BTreeMap<String, Arc<dyn DynJob>>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("job '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("job name must not be empty")]
    EmptyName,

    #[error("job name '{0}' cannot be used as a subcommand")]
    InvalidName(String),
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
        }
    }

    /// Register a job under `job.name()`.
    ///
    /// A second job with the same name is rejected; the first registration stays.
    pub fn add_job<J: Job>(&mut self, job: J) -> Result<(), RegistryError> {
        self.add_dyn_job(Arc::new(TypedJob::new(job)))
    }

    pub fn add_dyn_job(&mut self, job: Arc<dyn DynJob>) -> Result<(), RegistryError> {
        let name = job.name().to_string();
        validate_name(&name)?;
        if self.jobs.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.jobs.insert(name, job);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DynJob>> {
        self.jobs.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.jobs.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DynJob>> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
