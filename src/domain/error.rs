//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`. All error types
//! implement `thiserror::Error` and convert to `anyhow::Error` via the `?`
//! operator. None of them is recovered inside the dispatch pipeline — every
//! failure aborts the remaining environment sequence.

use std::path::PathBuf;

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Environment resolution failed: the configuration source is missing,
/// malformed, or resolves to no environments.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {}\n\nCreate it or pass --config <path>.", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot parse configuration {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Configuration defines no environments.")]
    Empty,

    #[error("No environment matches '{0}'.")]
    NoMatch(String),

    #[error(
        "Invalid environment short name '{0}': must match ^[a-z0-9]([a-z0-9-]{{0,30}}[a-z0-9])?$"
    )]
    InvalidShortName(String),
}

// ── Prompt errors ─────────────────────────────────────────────────────────────

/// The interactive confirmation channel failed.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Confirmation prompt unavailable: {0}\n\nRe-run with --noprompt to skip it.")]
    Unavailable(String),
}

// ── Operation errors ──────────────────────────────────────────────────────────

/// A command's business logic failed for one environment.
///
/// The rendering names both the command and the environment so the process
/// diagnostic identifies exactly where the sequence stopped.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{command} failed for environment '{environment}': {reason}")]
    Failed {
        command: String,
        environment: String,
        reason: anyhow::Error,
    },
}

// ── Packaging errors ──────────────────────────────────────────────────────────

/// Archive staging or commit failed.
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("Cannot read staging directory {}: {source}", .path.display())]
    StagingUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write archive {}: {source}", .path.display())]
    ArchiveWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
