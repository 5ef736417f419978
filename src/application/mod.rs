//! Application layer — port trait definitions and the dispatch pipeline.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod orchestrator;
pub mod ports;

#[allow(unused_imports)]
pub use orchestrator::{COMMANDS, CommandOutcome, CommandSpec, spec_for};
#[allow(unused_imports)]
pub use ports::{Clock, ConfigSource, Operation, ProceedPrompt};
