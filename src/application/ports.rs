//! Port trait definitions for the application layer.
//!
//! Ports are the contracts that infrastructure must fulfill. This file
//! imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;

use crate::domain::args::RawArgs;
use crate::domain::environment::{EnvironmentDescriptor, EnvironmentSet};

/// Resolves the ordered environment set addressed by one invocation.
#[allow(async_fn_in_trait)]
pub trait ConfigSource {
    /// Resolve the environments addressed by `args`.
    ///
    /// The returned order is the processing order.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when the configuration source is
    /// missing, malformed, or resolves to no environments.
    async fn resolve(&self, args: &RawArgs) -> Result<EnvironmentSet>;
}

/// Interactive confirmation channel.
#[allow(async_fn_in_trait)]
pub trait ProceedPrompt {
    /// Present the resolved environments and await a yes/no answer.
    ///
    /// # Errors
    ///
    /// Returns a `PromptError` when the channel fails (no TTY).
    async fn confirm(&self, environments: &EnvironmentSet, args: &RawArgs) -> Result<bool>;
}

/// A unit of work invoked once per resolved environment.
///
/// Implementations own the descriptor's artifact registry for the duration
/// of the call; the processor never runs two invocations concurrently, so
/// no shared mutable state exists between them.
#[allow(async_fn_in_trait)]
pub trait Operation {
    /// Apply the operation to one environment.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining environment sequence.
    async fn run(&self, args: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()>;
}

/// Timestamp source for artifact naming. Sync trait — no async needed.
pub trait Clock {
    /// Timestamp in `%Y%m%d%H%M%S` form, captured once per archive.
    fn export_stamp(&self) -> String;
}
