//! `stagehand check` — verify environment configuration and reachability.

use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use sha2::{Digest, Sha256};

use crate::application::ports::Operation;
use crate::domain::args::RawArgs;
use crate::domain::environment::{ArtifactKind, EnvironmentDescriptor};
use crate::infra::credentials::CredentialsStore;
use crate::infra::gateway::ContentGateway;
use crate::output::OutputContext;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated environment short names to target
    #[arg(long)]
    pub environment: Option<String>,

    /// Also fetch every listed page
    #[arg(long)]
    pub deep: bool,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub noprompt: bool,
}

impl CheckArgs {
    /// Flatten into the raw-argument record the pipeline consumes.
    #[must_use]
    pub fn raw(&self) -> RawArgs {
        let mut raw = RawArgs::new("check").with_noprompt(self.noprompt);
        if let Some(config) = &self.config {
            raw = raw.with_option("config", config.display().to_string());
        }
        if let Some(environment) = &self.environment {
            raw = raw.with_option("environment", environment.clone());
        }
        if self.deep {
            raw = raw.with_option("deep", "true");
        }
        raw
    }
}

/// Verifies credentials, reachability, and manifest availability of one
/// environment.
pub struct CheckData<'a> {
    out: &'a OutputContext,
    gateway: &'a ContentGateway,
    credentials: &'a CredentialsStore,
}

impl<'a> CheckData<'a> {
    #[must_use]
    pub fn new(
        out: &'a OutputContext,
        gateway: &'a ContentGateway,
        credentials: &'a CredentialsStore,
    ) -> Self {
        Self {
            out,
            gateway,
            credentials,
        }
    }
}

impl Operation for CheckData<'_> {
    async fn run(&self, args: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        self.out.header(&format!(
            "Checking {} ({})",
            environment.app.name, environment.app.short_name
        ));

        match &environment.credentials_id {
            Some(id) if self.credentials.token(id)?.is_some() => {
                self.out.success(&format!("credential '{id}' present"));
            }
            Some(id) => {
                self.out.warn(&format!(
                    "no stored credential '{id}' (requests run unauthenticated)"
                ));
            }
            None => self.out.info("no credentials_id configured"),
        }

        self.gateway.ping(environment)?;
        self.out.success("content API reachable");

        let manifest = self.gateway.fetch_manifest(environment)?;
        self.out
            .success(&format!("{} pages listed", manifest.pages.len()));

        if args.has_option("deep") {
            let mut bytes = 0usize;
            for page in &manifest.pages {
                bytes += self.gateway.fetch_page(environment, &page.id)?.len();
            }
            self.out.success(&format!(
                "fetched {} pages ({bytes} bytes)",
                manifest.pages.len()
            ));
        }

        // A FullExport recorded earlier in this run is verifiable in place.
        if let Some(archive) = environment.artifacts.get(ArtifactKind::FullExport) {
            let digest = sha256_file(archive)?;
            self.out.kv(
                "export archive",
                &format!("{} (sha256 {})", archive.display(), &digest[..12]),
            );
        }

        Ok(())
    }
}

/// Compute the SHA256 hex digest of a file, reading in 64 KB chunks.
fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 65536];
    loop {
        let n = file.read(&mut buf).context("reading file")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}
