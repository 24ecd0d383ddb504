//! Test helpers: log capture and scripted jobs.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::context::JobContext;
use crate::domain::{JobConfig, JobError, Outcome};
use crate::impls::LogEnricher;
use crate::trace::TraceRegistry;
use crate::typed::Job;

/// Trace registry with its own enricher, so tests never touch the global one.
pub(crate) fn local_trace() -> Arc<TraceRegistry> {
    Arc::new(TraceRegistry::new(Arc::new(LogEnricher::new())))
}

#[derive(Clone, Default)]
pub(crate) struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

pub(crate) struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(self.buf.clone())
    }
}

impl CapturedLogs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .finish()
    }

    pub(crate) fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::subscriber::with_default(self.subscriber(), f)
    }

    /// Route this thread's events here until the guard drops.
    pub(crate) fn set_default(&self) -> DefaultGuard {
        tracing::subscriber::set_default(self.subscriber())
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    pub(crate) fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_owned)
            .collect()
    }
}

/// Job with no work items.
pub(crate) struct NoopJob {
    name: &'static str,
    about: &'static str,
}

impl NoopJob {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name, about: "" }
    }

    pub(crate) fn with_about(mut self, about: &'static str) -> Self {
        self.about = about;
        self
    }
}

#[async_trait]
impl Job for NoopJob {
    type Item = ();

    fn name(&self) -> &str {
        self.name
    }

    fn about(&self) -> &str {
        self.about
    }

    async fn load(&self, _ctx: &JobContext, _config: &JobConfig) -> Result<Vec<()>, JobError> {
        Ok(Vec::new())
    }

    async fn process(&self, _ctx: &JobContext, _config: &JobConfig, _item: ()) -> Outcome {
        Outcome::success()
    }
}

/// Job whose item `i` succeeds iff `outcomes[i]`. Records what it was given.
pub(crate) struct ScriptedJob {
    name: &'static str,
    outcomes: Vec<bool>,
    load_error: Option<&'static str>,
    configs: Arc<Mutex<Vec<JobConfig>>>,
    contexts: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
}

impl ScriptedJob {
    pub(crate) fn new(name: &'static str, outcomes: Vec<bool>) -> Self {
        Self {
            name,
            outcomes,
            load_error: None,
            configs: Arc::default(),
            contexts: Arc::default(),
        }
    }

    pub(crate) fn failing_load(mut self, message: &'static str) -> Self {
        self.load_error = Some(message);
        self
    }

    pub(crate) fn configs(&self) -> Arc<Mutex<Vec<JobConfig>>> {
        Arc::clone(&self.configs)
    }

    pub(crate) fn contexts(&self) -> Arc<Mutex<Vec<BTreeMap<String, String>>>> {
        Arc::clone(&self.contexts)
    }
}

#[async_trait]
impl Job for ScriptedJob {
    type Item = usize;

    fn name(&self) -> &str {
        self.name
    }

    async fn load(&self, _ctx: &JobContext, config: &JobConfig) -> Result<Vec<usize>, JobError> {
        self.configs.lock().unwrap().push(config.clone());
        if let Some(message) = self.load_error {
            return Err(JobError::load(message));
        }
        Ok((0..self.outcomes.len()).collect())
    }

    async fn process(&self, ctx: &JobContext, config: &JobConfig, item: usize) -> Outcome {
        self.configs.lock().unwrap().push(config.clone());
        let values = ctx
            .values()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.contexts.lock().unwrap().push(values);

        if self.outcomes[item] {
            Outcome::success()
        } else {
            Outcome::failure(format!("item {item} scripted to fail"))
        }
    }
}
