//! `stagehand dependency-manager` — inspect or pin environment dependencies.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::application::ports::Operation;
use crate::domain::args::RawArgs;
use crate::domain::environment::EnvironmentDescriptor;
use crate::infra::gateway::ContentGateway;
use crate::output::OutputContext;

/// Arguments for the dependency-manager command.
#[derive(Args)]
pub struct DependencyManagerArgs {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated environment short names to target
    #[arg(long)]
    pub environment: Option<String>,

    /// Pin one dependency instead of listing (format: name@version)
    #[arg(long)]
    pub pin: Option<String>,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub noprompt: bool,
}

impl DependencyManagerArgs {
    /// Flatten into the raw-argument record the pipeline consumes.
    #[must_use]
    pub fn raw(&self) -> RawArgs {
        let mut raw = RawArgs::new("dependency-manager").with_noprompt(self.noprompt);
        if let Some(config) = &self.config {
            raw = raw.with_option("config", config.display().to_string());
        }
        if let Some(environment) = &self.environment {
            raw = raw.with_option("environment", environment.clone());
        }
        if let Some(pin) = &self.pin {
            raw = raw.with_option("pin", pin.clone());
        }
        raw
    }
}

/// Lists or pins one environment's dependency manifest.
pub struct DependencyManager<'a> {
    out: &'a OutputContext,
    gateway: &'a ContentGateway,
}

impl<'a> DependencyManager<'a> {
    #[must_use]
    pub fn new(out: &'a OutputContext, gateway: &'a ContentGateway) -> Self {
        Self { out, gateway }
    }
}

impl Operation for DependencyManager<'_> {
    async fn run(&self, args: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        if let Some(pin) = args.option("pin") {
            let (name, version) = parse_pin(pin)?;
            self.gateway.pin_dependency(environment, name, version)?;
            self.out.success(&format!(
                "Pinned {name} to {version} on {}",
                environment.app.short_name
            ));
            return Ok(());
        }

        let dependencies = self.gateway.fetch_dependencies(environment)?;
        self.out.header(&format!(
            "Dependencies of {} ({})",
            environment.app.name, environment.app.short_name
        ));
        if dependencies.is_empty() {
            self.out.info("none declared");
        }
        for (name, version) in &dependencies {
            self.out.kv(name, version);
        }
        Ok(())
    }
}

fn parse_pin(pin: &str) -> Result<(&str, &str)> {
    let (name, version) = pin
        .split_once('@')
        .context("--pin expects <name>@<version>")?;
    anyhow::ensure!(
        !name.is_empty() && !version.is_empty(),
        "--pin expects <name>@<version>"
    );
    Ok((name, version))
}
