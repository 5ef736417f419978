//! `stagehand execute` — run a script of API steps per environment.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use crate::application::ports::Operation;
use crate::domain::args::RawArgs;
use crate::domain::environment::{ArtifactKind, EnvironmentDescriptor};
use crate::infra::gateway::ContentGateway;
use crate::output::OutputContext;

/// Arguments for the execute command.
#[derive(Args)]
pub struct ExecuteArgs {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated environment short names to target
    #[arg(long)]
    pub environment: Option<String>,

    /// YAML script of API steps to run
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub noprompt: bool,
}

impl ExecuteArgs {
    /// Flatten into the raw-argument record the pipeline consumes.
    #[must_use]
    pub fn raw(&self) -> RawArgs {
        let mut raw = RawArgs::new("execute").with_noprompt(self.noprompt);
        if let Some(config) = &self.config {
            raw = raw.with_option("config", config.display().to_string());
        }
        if let Some(environment) = &self.environment {
            raw = raw.with_option("environment", environment.clone());
        }
        if let Some(script) = &self.script {
            raw = raw.with_option("script", script.display().to_string());
        }
        raw
    }
}

/// One API step of an execution script.
#[derive(Debug, Deserialize)]
pub struct ScriptStep {
    pub name: String,
    #[serde(default = "default_method")]
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

fn default_method() -> String {
    "POST".to_string()
}

/// An execution script: ordered steps, run fail-fast.
#[derive(Debug, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

/// Runs the script's steps against one environment, in order.
pub struct ExecuteScript<'a> {
    out: &'a OutputContext,
    gateway: &'a ContentGateway,
}

impl<'a> ExecuteScript<'a> {
    #[must_use]
    pub fn new(out: &'a OutputContext, gateway: &'a ContentGateway) -> Self {
        Self { out, gateway }
    }
}

impl Operation for ExecuteScript<'_> {
    async fn run(&self, args: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        let script_path = args
            .option("script")
            .context("execute requires --script <path>")?;
        let script = load_script(Path::new(script_path))?;
        anyhow::ensure!(
            !script.steps.is_empty(),
            "script {script_path} has no steps"
        );

        fs::create_dir_all(&environment.temp_dir)
            .with_context(|| format!("creating {}", environment.temp_dir.display()))?;
        let log_path = environment.temp_dir.join("execution.log");
        let mut log = fs::File::create(&log_path)
            .with_context(|| format!("creating {}", log_path.display()))?;

        for step in &script.steps {
            self.out.info(&format!(
                "Running step '{}' against {}",
                step.name, environment.app.short_name
            ));
            match self
                .gateway
                .execute_step(environment, &step.method, &step.path, &step.body)
            {
                Ok(_) => {
                    writeln!(log, "ok {}", step.name)
                        .with_context(|| format!("writing {}", log_path.display()))?;
                }
                Err(e) => {
                    // The partial log is still an artifact worth keeping.
                    let _ = writeln!(log, "failed {}: {e}", step.name);
                    environment
                        .artifacts
                        .record(ArtifactKind::ExecutionLog, log_path.clone());
                    return Err(e.context(format!("step '{}'", step.name)));
                }
            }
        }

        environment
            .artifacts
            .record(ArtifactKind::ExecutionLog, log_path.clone());
        self.out.success(&format!(
            "{} steps completed (log: {})",
            script.steps.len(),
            log_path.display()
        ));
        Ok(())
    }
}

fn load_script(path: &Path) -> Result<Script> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
