//! `stagehand credentials-manager` — manage the local credentials store.
//!
//! The one environment-less command: it resolves to the `no-env` sentinel
//! and never prompts for confirmation. Token values are read from
//! `STAGEHAND_TOKEN` or an interactive password prompt, never from argv.

use anyhow::Result;
use clap::Args;

use crate::application::ports::Operation;
use crate::domain::args::RawArgs;
use crate::domain::environment::EnvironmentDescriptor;
use crate::domain::error::PromptError;
use crate::infra::credentials::CredentialsStore;
use crate::output::OutputContext;

/// Arguments for the credentials-manager command.
#[derive(Args)]
pub struct CredentialsManagerArgs {
    /// List stored credential ids
    #[arg(long, conflicts_with_all = ["set", "remove"])]
    pub list: bool,

    /// Store a credential under this id (value from STAGEHAND_TOKEN or an
    /// interactive prompt)
    #[arg(long, conflicts_with = "remove")]
    pub set: Option<String>,

    /// Remove the credential stored under this id
    #[arg(long)]
    pub remove: Option<String>,

    /// Accepted for symmetry with the other commands; has no effect here
    #[arg(long)]
    pub noprompt: bool,
}

impl CredentialsManagerArgs {
    /// Flatten into the raw-argument record the pipeline consumes.
    #[must_use]
    pub fn raw(&self) -> RawArgs {
        let mut raw = RawArgs::new("credentials-manager").with_noprompt(self.noprompt);
        if self.list {
            raw = raw.with_option("list", "true");
        }
        if let Some(id) = &self.set {
            raw = raw.with_option("set", id.clone());
        }
        if let Some(id) = &self.remove {
            raw = raw.with_option("remove", id.clone());
        }
        raw
    }
}

/// Manages the local credentials store.
pub struct CredentialsManager<'a> {
    out: &'a OutputContext,
    store: &'a CredentialsStore,
}

impl<'a> CredentialsManager<'a> {
    #[must_use]
    pub fn new(out: &'a OutputContext, store: &'a CredentialsStore) -> Self {
        Self { out, store }
    }

    fn list(&self) -> Result<()> {
        let entries = self.store.load()?;
        if entries.is_empty() {
            self.out.info("No credentials stored");
            return Ok(());
        }
        self.out
            .header(&format!("Credentials in {}", self.store.path()?.display()));
        for id in entries.keys() {
            self.out.kv(id, "********");
        }
        Ok(())
    }

    fn set(&self, id: &str) -> Result<()> {
        let token = match std::env::var("STAGEHAND_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => dialoguer::Password::new()
                .with_prompt(format!("Token for '{id}'"))
                .interact()
                .map_err(|e| PromptError::Unavailable(e.to_string()))?,
        };
        let mut entries = self.store.load()?;
        entries.insert(id.to_string(), token);
        self.store.save(&entries)?;
        self.out.success(&format!("Stored credential '{id}'"));
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut entries = self.store.load()?;
        if entries.remove(id).is_none() {
            self.out.warn(&format!("no credential '{id}' stored"));
            return Ok(());
        }
        self.store.save(&entries)?;
        self.out.success(&format!("Removed credential '{id}'"));
        Ok(())
    }
}

impl Operation for CredentialsManager<'_> {
    async fn run(&self, args: &RawArgs, _environment: &mut EnvironmentDescriptor) -> Result<()> {
        if args.has_option("list") {
            return self.list();
        }
        if let Some(id) = args.option("set") {
            return self.set(id);
        }
        if let Some(id) = args.option("remove") {
            return self.remove(id);
        }
        anyhow::bail!("credentials-manager requires one of --list, --set <id>, --remove <id>")
    }
}
