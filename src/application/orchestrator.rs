//! The multi-environment command dispatch pipeline.
//!
//! Turns raw arguments into a resolved environment set, a go/no-go
//! confirmation decision, and one operation invocation per environment in
//! resolution order, failing fast on the first error. The individual
//! operation bodies are opaque collaborators behind the [`Operation`] port.

use anyhow::Result;

use crate::application::ports::{ConfigSource, Operation, ProceedPrompt};
use crate::domain::args::RawArgs;
use crate::domain::environment::EnvironmentSet;
use crate::domain::error::OperationError;

// ── Dispatch table ────────────────────────────────────────────────────────────

/// Static pairing of a command name, its usage text, and its resolution
/// mode. Constructed once, never mutated.
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    /// Environment-less commands resolve to the `no-env` singleton and
    /// never prompt.
    pub envless: bool,
}

pub static EXPORT: CommandSpec = CommandSpec {
    name: "export",
    usage: "\
Usage: stagehand export [options]

Stage the content of each targeted environment and package the staging
directory into <app>_<timestamp>_full_export.zip.

Options:
  --config <path>        Configuration file (default: ~/.stagehand/config.yaml)
  --environment <list>   Comma-separated environment short names to target
  --keep-staging         Keep staged files next to the archive
  --noprompt             Skip the interactive confirmation",
    envless: false,
};

pub static CHECK: CommandSpec = CommandSpec {
    name: "check",
    usage: "\
Usage: stagehand check [options]

Verify the configuration, stored credentials, and API reachability of each
targeted environment.

Options:
  --config <path>        Configuration file (default: ~/.stagehand/config.yaml)
  --environment <list>   Comma-separated environment short names to target
  --deep                 Also fetch every listed page
  --noprompt             Skip the interactive confirmation",
    envless: false,
};

pub static COMPARE: CommandSpec = CommandSpec {
    name: "compare",
    usage: "\
Usage: stagehand compare [options]

Diff a baseline export archive against the live content of each targeted
environment.

Options:
  --config <path>        Configuration file (default: ~/.stagehand/config.yaml)
  --environment <list>   Comma-separated environment short names to target
  --archive <path>       Baseline archive (default: this run's export artifact)
  --report               Write a JSON report into the staging directory
  --noprompt             Skip the interactive confirmation",
    envless: false,
};

pub static EXECUTE: CommandSpec = CommandSpec {
    name: "execute",
    usage: "\
Usage: stagehand execute [options]

Run the steps of a script file against each targeted environment, in order,
stopping at the first failure.

Options:
  --config <path>        Configuration file (default: ~/.stagehand/config.yaml)
  --environment <list>   Comma-separated environment short names to target
  --script <path>        YAML script of API steps to run (required)
  --noprompt             Skip the interactive confirmation",
    envless: false,
};

pub static DEPENDENCY_MANAGER: CommandSpec = CommandSpec {
    name: "dependency-manager",
    usage: "\
Usage: stagehand dependency-manager [options]

List the dependency manifest of each targeted environment, or pin one
dependency to a version.

Options:
  --config <path>        Configuration file (default: ~/.stagehand/config.yaml)
  --environment <list>   Comma-separated environment short names to target
  --pin <name@version>   Pin one dependency instead of listing
  --noprompt             Skip the interactive confirmation",
    envless: false,
};

pub static CREDENTIALS_MANAGER: CommandSpec = CommandSpec {
    name: "credentials-manager",
    usage: "\
Usage: stagehand credentials-manager [options]

Manage the local credentials store. Runs without an environment context and
never prompts for confirmation.

Options:
  --list                 List stored credential ids
  --set <id>             Store a credential (value from STAGEHAND_TOKEN or an
                         interactive prompt, never from the command line)
  --remove <id>          Remove a stored credential
  --noprompt             Accepted for symmetry; has no effect here",
    envless: true,
};

/// The dispatch table: one entry per public command.
pub static COMMANDS: &[&CommandSpec] = &[
    &EXPORT,
    &CHECK,
    &COMPARE,
    &EXECUTE,
    &DEPENDENCY_MANAGER,
    &CREDENTIALS_MANAGER,
];

/// Look up a command entry by name.
#[must_use]
pub fn spec_for(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name).copied()
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// How a command invocation ended without error.
///
/// Replaces process-exit-as-control-flow: the caller decides the actual
/// exit code (every variant maps to 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Bare command: the caller should print the usage text; nothing ran.
    UsageShown,
    /// The confirmation gate answered no; a normal, silent no-op.
    Declined,
    /// Every environment was processed.
    Completed,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run one command through the dispatch pipeline.
///
/// Sequence: usage short-circuit, environment resolution, confirmation
/// gate, per-environment processing. Each public command is this exact
/// sequence parameterized only by its [`CommandSpec`] and [`Operation`].
///
/// # Errors
///
/// Propagates resolution, prompt, and operation failures unchanged; adds
/// no retry logic.
pub async fn handle_command(
    spec: &CommandSpec,
    args: &RawArgs,
    config: &impl ConfigSource,
    prompt: &impl ProceedPrompt,
    operation: &impl Operation,
) -> Result<CommandOutcome> {
    if args.is_command_only() {
        return Ok(CommandOutcome::UsageShown);
    }

    let mut environments = config.resolve(args).await?;

    if !decide_proceed(&environments, args, prompt).await? {
        return Ok(CommandOutcome::Declined);
    }

    process_environments(spec.name, &mut environments, args, operation).await?;
    Ok(CommandOutcome::Completed)
}

/// The confirmation gate. The first true short-circuits — the interactive
/// prompt is only reached when neither `--noprompt` nor the environment-less
/// singleton applies.
///
/// # Errors
///
/// Propagates a failed interactive prompt.
pub async fn decide_proceed(
    environments: &EnvironmentSet,
    args: &RawArgs,
    prompt: &impl ProceedPrompt,
) -> Result<bool> {
    if args.noprompt() {
        return Ok(true);
    }
    if environments.is_envless_single() {
        return Ok(true);
    }
    prompt.confirm(environments, args).await
}

/// Invoke `operation` once per environment, in resolution order.
///
/// Strictly sequential: each invocation is awaited before the next one
/// starts. The first failure wraps into [`OperationError::Failed`] and
/// propagates immediately — remaining environments are not processed.
///
/// # Errors
///
/// Returns the wrapped failure of the first environment that fails.
pub async fn process_environments(
    command: &str,
    environments: &mut EnvironmentSet,
    args: &RawArgs,
    operation: &impl Operation,
) -> Result<()> {
    for environment in environments.iter_mut() {
        if let Err(reason) = operation.run(args, environment).await {
            return Err(OperationError::Failed {
                command: command.to_string(),
                environment: environment.app.short_name.clone(),
                reason,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_public_command() {
        let names: Vec<&str> = COMMANDS.iter().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            vec![
                "export",
                "check",
                "compare",
                "execute",
                "dependency-manager",
                "credentials-manager",
            ]
        );
    }

    #[test]
    fn only_credentials_manager_is_envless() {
        for spec in COMMANDS {
            assert_eq!(spec.envless, spec.name == "credentials-manager");
        }
    }

    #[test]
    fn lookup_finds_known_and_rejects_unknown() {
        assert_eq!(spec_for("export").map(|s| s.name), Some("export"));
        assert!(spec_for("deploy").is_none());
    }

    #[test]
    fn usage_texts_name_their_command() {
        for spec in COMMANDS {
            assert!(
                spec.usage.contains(spec.name),
                "usage for {} does not mention it",
                spec.name
            );
        }
    }
}
