//! Environment descriptors, the `no-env` sentinel, and the artifact registry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::error::ConfigurationError;

/// Sentinel short name marking an environment-less run.
pub const NO_ENV: &str = "no-env";

/// Application identity of one deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub short_name: String,
}

impl AppIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
        }
    }

    /// True for the sentinel identity of an environment-less run.
    #[must_use]
    pub fn is_envless(&self) -> bool {
        self.short_name == NO_ENV
    }
}

/// Validate an environment short name.
///
/// Lowercase alphanumeric with inner dashes, at most 32 characters — the
/// same shape other identifiers in the configuration follow.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidShortName`] when the name does not
/// match the pattern.
#[allow(clippy::expect_used)] // the pattern is a compile-time constant
pub fn validate_short_name(short_name: &str) -> Result<(), ConfigurationError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]{0,30}[a-z0-9])?$").expect("valid pattern")
    });
    if pattern.is_match(short_name) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidShortName(short_name.to_string()))
    }
}

/// Kinds of artifacts an operation may record for later consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtifactKind {
    FullExport,
    CheckReport,
    CompareReport,
    ExecutionLog,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FullExport => "full-export",
            Self::CheckReport => "check-report",
            Self::CompareReport => "compare-report",
            Self::ExecutionLog => "execution-log",
        };
        f.write_str(label)
    }
}

/// The typed bookkeeping slot: artifact kind → produced path.
///
/// Operations record what they produced here; later consumers look paths
/// up instead of recomputing naming schemes.
#[derive(Debug, Default, Clone)]
pub struct ArtifactRegistry(BTreeMap<ArtifactKind, PathBuf>);

impl ArtifactRegistry {
    pub fn record(&mut self, kind: ArtifactKind, path: PathBuf) {
        self.0.insert(kind, path);
    }

    #[must_use]
    pub fn get(&self, kind: ArtifactKind) -> Option<&Path> {
        self.0.get(&kind).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &Path)> {
        self.0.iter().map(|(kind, path)| (*kind, path.as_path()))
    }
}

/// One resolved deployment target.
///
/// Owned exclusively by the orchestration run that created it; mutated in
/// place only by the operation currently processing it.
#[derive(Debug, Clone)]
pub struct EnvironmentDescriptor {
    pub app: AppIdentity,
    /// Base URI of the environment's content API. `None` for the sentinel.
    pub base_uri: Option<String>,
    /// Key into the credentials store, when the environment needs auth.
    pub credentials_id: Option<String>,
    /// Per-environment staging directory for produced artifacts.
    pub temp_dir: PathBuf,
    pub artifacts: ArtifactRegistry,
}

impl EnvironmentDescriptor {
    #[must_use]
    pub fn new(
        app: AppIdentity,
        base_uri: impl Into<String>,
        credentials_id: Option<String>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            app,
            base_uri: Some(base_uri.into()),
            credentials_id,
            temp_dir,
            artifacts: ArtifactRegistry::default(),
        }
    }

    /// The sentinel descriptor used by environment-less commands.
    #[must_use]
    pub fn envless(temp_dir: PathBuf) -> Self {
        Self {
            app: AppIdentity::new("local", NO_ENV),
            base_uri: None,
            credentials_id: None,
            temp_dir,
            artifacts: ArtifactRegistry::default(),
        }
    }
}

/// Ordered, non-empty sequence of environment descriptors.
#[derive(Debug, Clone)]
pub struct EnvironmentSet(Vec<EnvironmentDescriptor>);

impl EnvironmentSet {
    /// Build a set, rejecting an empty environment list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Empty`] for an empty list.
    pub fn new(environments: Vec<EnvironmentDescriptor>) -> Result<Self, ConfigurationError> {
        if environments.is_empty() {
            return Err(ConfigurationError::Empty);
        }
        Ok(Self(environments))
    }

    /// The singleton set for an environment-less run.
    #[must_use]
    pub fn envless(temp_dir: PathBuf) -> Self {
        Self(vec![EnvironmentDescriptor::envless(temp_dir)])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false — the constructor rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> &EnvironmentDescriptor {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnvironmentDescriptor> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EnvironmentDescriptor> {
        self.0.iter_mut()
    }

    /// True for an environment-less run: a single sentinel descriptor.
    /// Such runs never prompt for confirmation.
    #[must_use]
    pub fn is_envless_single(&self) -> bool {
        self.0.len() == 1 && self.0[0].app.is_envless()
    }
}
