//! Shared test helpers: mock collaborators for the dispatch pipeline.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use stagehand::application::ports::{Clock, ConfigSource, Operation, ProceedPrompt};
use stagehand::domain::args::RawArgs;
use stagehand::domain::environment::{AppIdentity, EnvironmentDescriptor, EnvironmentSet};
use stagehand::domain::error::ConfigurationError;

// ── Environment constructors ──────────────────────────────────────────────────

pub fn descriptor(name: &str, short_name: &str) -> EnvironmentDescriptor {
    EnvironmentDescriptor::new(
        AppIdentity::new(name, short_name),
        format!("https://{short_name}.example.test/{name}"),
        None,
        PathBuf::from("/tmp/stagehand-tests").join(format!("{name}_{short_name}")),
    )
}

pub fn set_of(environments: &[(&str, &str)]) -> EnvironmentSet {
    EnvironmentSet::new(
        environments
            .iter()
            .map(|(name, short_name)| descriptor(name, short_name))
            .collect(),
    )
    .expect("non-empty set")
}

// ── Config sources ────────────────────────────────────────────────────────────

/// Resolves to a fixed environment set.
pub struct StaticConfig(pub EnvironmentSet);

impl ConfigSource for StaticConfig {
    async fn resolve(&self, _: &RawArgs) -> Result<EnvironmentSet> {
        Ok(self.0.clone())
    }
}

/// Resolution must not be reached.
pub struct ConfigNotExpected;

impl ConfigSource for ConfigNotExpected {
    async fn resolve(&self, _: &RawArgs) -> Result<EnvironmentSet> {
        anyhow::bail!("resolve not expected in this test")
    }
}

/// Fails like a configuration file that defines no environments.
pub struct FailingConfig;

impl ConfigSource for FailingConfig {
    async fn resolve(&self, _: &RawArgs) -> Result<EnvironmentSet> {
        Err(ConfigurationError::Empty.into())
    }
}

// ── Prompts ───────────────────────────────────────────────────────────────────

/// Returns a fixed answer and counts invocations.
pub struct FixedPrompt {
    pub answer: bool,
    pub calls: AtomicUsize,
}

impl FixedPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProceedPrompt for FixedPrompt {
    async fn confirm(&self, _: &EnvironmentSet, _: &RawArgs) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// The prompt must not be reached.
pub struct PromptNotExpected;

impl ProceedPrompt for PromptNotExpected {
    async fn confirm(&self, _: &EnvironmentSet, _: &RawArgs) -> Result<bool> {
        anyhow::bail!("confirm not expected in this test")
    }
}

// ── Operations ────────────────────────────────────────────────────────────────

/// Records the environments it saw, optionally failing on the n-th
/// invocation (1-based).
pub struct RecordingOperation {
    seen: Mutex<Vec<String>>,
    fail_on: Option<usize>,
}

impl RecordingOperation {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(n: usize) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail_on: Some(n),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().expect("lock").len()
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }
}

impl Operation for RecordingOperation {
    async fn run(&self, _: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        let mut seen = self.seen.lock().expect("lock");
        seen.push(environment.app.short_name.clone());
        if self.fail_on == Some(seen.len()) {
            anyhow::bail!("operation exploded");
        }
        Ok(())
    }
}

// ── Clocks ────────────────────────────────────────────────────────────────────

/// Fixed timestamp for archive-naming tests.
pub struct FixedClock(pub &'static str);

impl Clock for FixedClock {
    fn export_stamp(&self) -> String {
        self.0.to_string()
    }
}
