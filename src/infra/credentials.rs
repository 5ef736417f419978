//! YAML credentials store (credential id → token).
//!
//! Tokens never travel through argv — `credentials-manager --set` reads the
//! value from `STAGEHAND_TOKEN` or an interactive password prompt.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// File-backed credential store under `~/.stagehand/credentials.yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialsStore;

impl CredentialsStore {
    /// Store location: `STAGEHAND_CREDENTIALS` env var, then
    /// `~/.stagehand/credentials.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("STAGEHAND_CREDENTIALS") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".stagehand").join("credentials.yaml"))
    }

    /// Load all stored credentials. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Persist the store, restricting it to the owner on Unix.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(entries).context("cannot serialize credentials")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    /// Look up one token by credential id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn token(&self, id: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(id).cloned())
    }
}
