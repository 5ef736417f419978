//! `stagehand export` — stage environment content and package it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::application::ports::{Clock, Operation};
use crate::domain::args::RawArgs;
use crate::domain::environment::EnvironmentDescriptor;
use crate::infra::gateway::ContentGateway;
use crate::infra::packager::ZipPackager;
use crate::output::{OutputContext, progress};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated environment short names to target
    #[arg(long)]
    pub environment: Option<String>,

    /// Keep staged files next to the archive
    #[arg(long)]
    pub keep_staging: bool,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub noprompt: bool,
}

impl ExportArgs {
    /// Flatten into the raw-argument record the pipeline consumes.
    #[must_use]
    pub fn raw(&self) -> RawArgs {
        let mut raw = RawArgs::new("export").with_noprompt(self.noprompt);
        if let Some(config) = &self.config {
            raw = raw.with_option("config", config.display().to_string());
        }
        if let Some(environment) = &self.environment {
            raw = raw.with_option("environment", environment.clone());
        }
        if self.keep_staging {
            raw = raw.with_option("keep-staging", "true");
        }
        raw
    }
}

/// Stages every page of one environment and packages the staging directory.
pub struct ExportData<'a, C: Clock> {
    out: &'a OutputContext,
    gateway: &'a ContentGateway,
    packager: ZipPackager<'a, C>,
}

impl<'a, C: Clock> ExportData<'a, C> {
    #[must_use]
    pub fn new(out: &'a OutputContext, gateway: &'a ContentGateway, packager: ZipPackager<'a, C>) -> Self {
        Self {
            out,
            gateway,
            packager,
        }
    }
}

impl<C: Clock> Operation for ExportData<'_, C> {
    async fn run(&self, args: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        let staging = environment.temp_dir.clone();
        reset_staging(&staging)?;

        let manifest = self.gateway.fetch_manifest(environment)?;
        let manifest_path = staging.join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("writing {}", manifest_path.display()))?;

        let pages_dir = staging.join("pages");
        fs::create_dir_all(&pages_dir)
            .with_context(|| format!("creating {}", pages_dir.display()))?;

        let bar = self.out.show_progress().then(|| {
            progress::bar(
                manifest.pages.len() as u64,
                &format!("Staging {} pages", manifest.pages.len()),
            )
        });
        for page in &manifest.pages {
            let body = self.gateway.fetch_page(environment, &page.id)?;
            let file_name = format!("{}.json", page.id.replace(['/', '\\'], "_"));
            let page_path = pages_dir.join(&file_name);
            fs::write(&page_path, body)
                .with_context(|| format!("writing {}", page_path.display()))?;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = &bar {
            progress::finish_success(bar, "staged");
        }

        let archive = self.packager.full_export(environment)?;

        if !args.has_option("keep-staging") {
            clean_staging(&staging, &archive)?;
        }

        self.out.success(&format!(
            "Exported {} ({}) to {}",
            environment.app.name,
            environment.app.short_name,
            archive.display()
        ));
        Ok(())
    }
}

/// Start from an empty staging directory; stale children would leak into
/// the archive.
fn reset_staging(staging: &Path) -> Result<()> {
    if staging.exists() {
        fs::remove_dir_all(staging).with_context(|| format!("clearing {}", staging.display()))?;
    }
    fs::create_dir_all(staging).with_context(|| format!("creating {}", staging.display()))
}

/// Remove staged children, leaving only the committed archive.
fn clean_staging(staging: &Path, archive: &Path) -> Result<()> {
    for entry in
        fs::read_dir(staging).with_context(|| format!("reading {}", staging.display()))?
    {
        let path = entry
            .with_context(|| format!("reading {}", staging.display()))?
            .path();
        if path == archive {
            continue;
        }
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.with_context(|| format!("removing {}", path.display()))?;
    }
    Ok(())
}
