//! `stagehand compare` — diff a baseline export against live content.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::application::ports::Operation;
use crate::domain::args::RawArgs;
use crate::domain::environment::{ArtifactKind, EnvironmentDescriptor};
use crate::infra::gateway::{ContentGateway, ContentManifest};
use crate::output::OutputContext;

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated environment short names to target
    #[arg(long)]
    pub environment: Option<String>,

    /// Baseline archive (default: this run's export artifact)
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Write a JSON report into the staging directory
    #[arg(long)]
    pub report: bool,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub noprompt: bool,
}

impl CompareArgs {
    /// Flatten into the raw-argument record the pipeline consumes.
    #[must_use]
    pub fn raw(&self) -> RawArgs {
        let mut raw = RawArgs::new("compare").with_noprompt(self.noprompt);
        if let Some(config) = &self.config {
            raw = raw.with_option("config", config.display().to_string());
        }
        if let Some(environment) = &self.environment {
            raw = raw.with_option("environment", environment.clone());
        }
        if let Some(archive) = &self.archive {
            raw = raw.with_option("archive", archive.display().to_string());
        }
        if self.report {
            raw = raw.with_option("report", "true");
        }
        raw
    }
}

/// Diffs a baseline manifest against one environment's live manifest.
pub struct CompareData<'a> {
    out: &'a OutputContext,
    gateway: &'a ContentGateway,
}

impl<'a> CompareData<'a> {
    #[must_use]
    pub fn new(out: &'a OutputContext, gateway: &'a ContentGateway) -> Self {
        Self { out, gateway }
    }
}

impl Operation for CompareData<'_> {
    async fn run(&self, args: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        let baseline_path = match args.option("archive") {
            Some(path) => PathBuf::from(path),
            None => environment
                .artifacts
                .get(ArtifactKind::FullExport)
                .ok_or_else(|| {
                    anyhow::anyhow!("no baseline: pass --archive <zip> or run export first")
                })?
                .to_path_buf(),
        };
        let baseline = manifest_from_archive(&baseline_path)?;
        let live = self.gateway.fetch_manifest(environment)?;
        let diff = diff_manifests(&baseline, &live);

        self.out.header(&format!(
            "Comparing {} ({}) against {}",
            environment.app.name,
            environment.app.short_name,
            baseline_path.display()
        ));
        for id in &diff.added {
            self.out.kv("added", id);
        }
        for id in &diff.removed {
            self.out.kv("removed", id);
        }
        for id in &diff.changed {
            self.out.kv("changed", id);
        }
        if diff.is_unchanged() {
            self.out.success("no differences");
        } else {
            self.out.info(&format!(
                "{} added, {} removed, {} changed",
                diff.added.len(),
                diff.removed.len(),
                diff.changed.len()
            ));
        }

        if args.has_option("report") {
            fs::create_dir_all(&environment.temp_dir)
                .with_context(|| format!("creating {}", environment.temp_dir.display()))?;
            let report_path = environment
                .temp_dir
                .join(format!("{}_compare_report.json", environment.app.name));
            let report = serde_json::json!({
                "baseline": baseline_path.display().to_string(),
                "added": diff.added,
                "removed": diff.removed,
                "changed": diff.changed,
            });
            fs::write(&report_path, serde_json::to_string_pretty(&report)?)
                .with_context(|| format!("writing {}", report_path.display()))?;
            environment
                .artifacts
                .record(ArtifactKind::CompareReport, report_path.clone());
            self.out
                .success(&format!("report written to {}", report_path.display()));
        }

        Ok(())
    }
}

/// Page-level difference between two manifests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl ManifestDiff {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Diff page ids and revisions. Pure function — no I/O.
#[must_use]
pub fn diff_manifests(baseline: &ContentManifest, live: &ContentManifest) -> ManifestDiff {
    let base: BTreeMap<&str, u64> = baseline
        .pages
        .iter()
        .map(|page| (page.id.as_str(), page.revision))
        .collect();
    let current: BTreeMap<&str, u64> = live
        .pages
        .iter()
        .map(|page| (page.id.as_str(), page.revision))
        .collect();

    let mut diff = ManifestDiff::default();
    for (id, revision) in &current {
        match base.get(id) {
            None => diff.added.push((*id).to_string()),
            Some(previous) if previous != revision => diff.changed.push((*id).to_string()),
            Some(_) => {}
        }
    }
    for id in base.keys() {
        if !current.contains_key(id) {
            diff.removed.push((*id).to_string());
        }
    }
    diff
}

/// Read `manifest.json` out of a previously exported archive.
fn manifest_from_archive(path: &Path) -> Result<ContentManifest> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("reading archive {}", path.display()))?;
    let mut entry = archive
        .by_name("manifest.json")
        .with_context(|| format!("{} has no manifest.json", path.display()))?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .context("reading manifest.json")?;
    serde_json::from_str(&content).context("parsing manifest.json")
}
