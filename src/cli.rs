//! CLI argument parsing with clap derive and command wiring.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::application::orchestrator::{self, CommandOutcome, CommandSpec};
use crate::application::ports::{ConfigSource, Operation, ProceedPrompt};
use crate::commands::check::{CheckArgs, CheckData};
use crate::commands::compare::{CompareArgs, CompareData};
use crate::commands::credentials_manager::{CredentialsManager, CredentialsManagerArgs};
use crate::commands::dependency_manager::{DependencyManager, DependencyManagerArgs};
use crate::commands::execute::{ExecuteArgs, ExecuteScript};
use crate::commands::export::{ExportArgs, ExportData};
use crate::domain::args::RawArgs;
use crate::infra::config::YamlConfigSource;
use crate::infra::credentials::CredentialsStore;
use crate::infra::gateway::ContentGateway;
use crate::infra::packager::{SystemClock, ZipPackager};
use crate::infra::prompt::DialoguerPrompt;
use crate::output::OutputContext;

/// Top-level usage shown when no subcommand is given. Printed as-is; it
/// never enters the dispatch pipeline.
pub const TOP_USAGE: &str = "\
Usage: stagehand <command> [options]

Commands:
  export               Export environment content into a zip archive
  check                Check environment configuration and reachability
  compare              Compare a baseline export against live content
  execute              Execute a script of API steps per environment
  dependency-manager   Inspect or pin environment dependencies
  credentials-manager  Manage stored credentials

Run 'stagehand <command>' without options for that command's usage.";

/// Multi-environment operations CLI
#[derive(Parser)]
#[command(
    name = "stagehand",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export environment content into a zip archive
    Export(ExportArgs),

    /// Check environment configuration and reachability
    Check(CheckArgs),

    /// Compare a baseline export against live content
    Compare(CompareArgs),

    /// Execute a script of API steps against each environment
    Execute(ExecuteArgs),

    /// Inspect or pin environment dependencies
    #[command(name = "dependency-manager")]
    DependencyManager(DependencyManagerArgs),

    /// Manage stored credentials
    #[command(name = "credentials-manager")]
    CredentialsManager(CredentialsManagerArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error when the dispatched command fails; the caller maps
    /// it to a non-zero exit code.
    pub async fn run(self) -> Result<CommandOutcome> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let out = OutputContext::new(no_color, quiet);

        let Some(command) = command else {
            out.plain(TOP_USAGE);
            return Ok(CommandOutcome::UsageShown);
        };

        let config = YamlConfigSource;
        let prompt = DialoguerPrompt::new(&out);
        let credentials = CredentialsStore;
        let gateway = ContentGateway::new(credentials);
        let clock = SystemClock;

        match command {
            Command::Export(args) => {
                let operation = ExportData::new(&out, &gateway, ZipPackager::new(&out, &clock));
                dispatch(
                    &orchestrator::EXPORT,
                    &args.raw(),
                    &out,
                    &config,
                    &prompt,
                    &operation,
                )
                .await
            }
            Command::Check(args) => {
                let operation = CheckData::new(&out, &gateway, &credentials);
                dispatch(
                    &orchestrator::CHECK,
                    &args.raw(),
                    &out,
                    &config,
                    &prompt,
                    &operation,
                )
                .await
            }
            Command::Compare(args) => {
                let operation = CompareData::new(&out, &gateway);
                dispatch(
                    &orchestrator::COMPARE,
                    &args.raw(),
                    &out,
                    &config,
                    &prompt,
                    &operation,
                )
                .await
            }
            Command::Execute(args) => {
                let operation = ExecuteScript::new(&out, &gateway);
                dispatch(
                    &orchestrator::EXECUTE,
                    &args.raw(),
                    &out,
                    &config,
                    &prompt,
                    &operation,
                )
                .await
            }
            Command::DependencyManager(args) => {
                let operation = DependencyManager::new(&out, &gateway);
                dispatch(
                    &orchestrator::DEPENDENCY_MANAGER,
                    &args.raw(),
                    &out,
                    &config,
                    &prompt,
                    &operation,
                )
                .await
            }
            Command::CredentialsManager(args) => {
                let operation = CredentialsManager::new(&out, &credentials);
                dispatch(
                    &orchestrator::CREDENTIALS_MANAGER,
                    &args.raw(),
                    &out,
                    &config,
                    &prompt,
                    &operation,
                )
                .await
            }
        }
    }
}

/// Run the dispatch pipeline and print the usage text when it
/// short-circuits. Every command entry point is this exact call
/// parameterized by its spec and operation.
async fn dispatch(
    spec: &CommandSpec,
    args: &RawArgs,
    out: &OutputContext,
    config: &impl ConfigSource,
    prompt: &impl ProceedPrompt,
    operation: &impl Operation,
) -> Result<CommandOutcome> {
    let outcome = orchestrator::handle_command(spec, args, config, prompt, operation).await?;
    if outcome == CommandOutcome::UsageShown {
        out.plain(spec.usage);
    }
    Ok(outcome)
}
