//! YAML-backed implementation of the `ConfigSource` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::orchestrator::spec_for;
use crate::application::ports::ConfigSource;
use crate::domain::args::RawArgs;
use crate::domain::environment::{
    AppIdentity, EnvironmentDescriptor, EnvironmentSet, validate_short_name,
};
use crate::domain::error::ConfigurationError;

/// On-disk configuration schema.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    /// Root of all per-environment staging directories.
    #[serde(default)]
    temp_dir: Option<PathBuf>,
    #[serde(default)]
    environments: Vec<EnvironmentEntry>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentEntry {
    name: String,
    short_name: String,
    base_uri: String,
    #[serde(default)]
    credentials_id: Option<String>,
}

/// Production `ConfigSource` reading `~/.stagehand/config.yaml`.
pub struct YamlConfigSource;

impl YamlConfigSource {
    /// Resolution order: `--config` option, `STAGEHAND_CONFIG`, then
    /// `~/.stagehand/config.yaml`.
    fn path(args: &RawArgs) -> Result<PathBuf> {
        if let Some(path) = args.option("config") {
            return Ok(PathBuf::from(path));
        }
        if let Ok(val) = std::env::var("STAGEHAND_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".stagehand").join("config.yaml"))
    }

    fn load(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Err(ConfigurationError::NotFound(path.to_path_buf()).into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigurationError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl ConfigSource for YamlConfigSource {
    #[allow(clippy::unused_async)] // port contract: resolution is a suspension point
    async fn resolve(&self, args: &RawArgs) -> Result<EnvironmentSet> {
        if spec_for(args.command()).is_some_and(|spec| spec.envless) {
            return Ok(EnvironmentSet::envless(default_temp_root().join("local")));
        }

        let path = Self::path(args)?;
        let file = Self::load(&path)?;
        resolve_entries(file, args)
    }
}

/// Turn the parsed file into the ordered environment set for `args`.
///
/// A `--environment a,b` filter keeps matching entries in file order —
/// the file is the canonical processing sequence.
fn resolve_entries(file: ConfigFile, args: &RawArgs) -> Result<EnvironmentSet> {
    let temp_root = file.temp_dir.unwrap_or_else(default_temp_root);

    let mut entries = file.environments;
    if entries.is_empty() {
        return Err(ConfigurationError::Empty.into());
    }

    if let Some(filter) = args.option("environment") {
        let wanted: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        entries.retain(|entry| wanted.contains(&entry.short_name.as_str()));
        if entries.is_empty() {
            return Err(ConfigurationError::NoMatch(filter.to_string()).into());
        }
    }

    let mut environments = Vec::with_capacity(entries.len());
    for entry in entries {
        validate_short_name(&entry.short_name)?;
        let staging = temp_root.join(format!("{}_{}", entry.name, entry.short_name));
        environments.push(EnvironmentDescriptor::new(
            AppIdentity::new(entry.name, entry.short_name),
            entry.base_uri,
            entry.credentials_id,
            staging,
        ));
    }
    Ok(EnvironmentSet::new(environments)?)
}

fn default_temp_root() -> PathBuf {
    std::env::temp_dir().join("stagehand")
}
