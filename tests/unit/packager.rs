//! Archive packager naming and bookkeeping tests.

#![allow(clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use stagehand::domain::environment::{AppIdentity, ArtifactKind, EnvironmentDescriptor};
use stagehand::domain::error::PackagingError;
use stagehand::infra::packager::ZipPackager;
use stagehand::output::OutputContext;

use crate::helpers::FixedClock;

fn quiet_out() -> OutputContext {
    OutputContext::new(true, true)
}

fn staged_environment(staging: PathBuf) -> EnvironmentDescriptor {
    EnvironmentDescriptor::new(
        AppIdentity::new("sales", "dev"),
        "https://dev.example.test/sales",
        None,
        staging,
    )
}

#[test]
fn archive_name_uses_the_single_captured_stamp() {
    let dir = tempfile::tempdir().expect("temp dir");
    let staging = dir.path().join("sales_dev");
    fs::create_dir_all(staging.join("pages")).expect("staging dirs");
    fs::write(staging.join("manifest.json"), "{\"pages\":[]}").expect("manifest");
    fs::write(staging.join("pages").join("intro.json"), "{}").expect("page");

    let out = quiet_out();
    let clock = FixedClock("20240101120000");
    let mut environment = staged_environment(staging.clone());

    let archive = ZipPackager::new(&out, &clock)
        .full_export(&mut environment)
        .expect("packages");

    assert_eq!(
        archive,
        staging.join("sales_20240101120000_full_export.zip")
    );
    assert!(archive.exists());

    // The same path is recorded in the bookkeeping slot.
    assert_eq!(
        environment.artifacts.get(ArtifactKind::FullExport),
        Some(archive.as_path())
    );
}

#[test]
fn archive_contains_the_staged_children() {
    let dir = tempfile::tempdir().expect("temp dir");
    let staging = dir.path().join("sales_dev");
    fs::create_dir_all(staging.join("pages")).expect("staging dirs");
    fs::write(staging.join("manifest.json"), "{\"pages\":[]}").expect("manifest");
    fs::write(staging.join("pages").join("intro.json"), "{}").expect("page");

    let out = quiet_out();
    let clock = FixedClock("20240101120000");
    let mut environment = staged_environment(staging);

    let archive = ZipPackager::new(&out, &clock)
        .full_export(&mut environment)
        .expect("packages");

    let file = fs::File::open(&archive).expect("open archive");
    let mut zip = zip::ZipArchive::new(file).expect("read archive");
    assert!(zip.by_name("manifest.json").is_ok());
    assert!(zip.by_name("pages/intro.json").is_ok());
}

#[test]
fn missing_staging_directory_is_a_staging_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = quiet_out();
    let clock = FixedClock("20240101120000");
    let mut environment = staged_environment(dir.path().join("never_created"));

    let err = ZipPackager::new(&out, &clock)
        .full_export(&mut environment)
        .expect_err("no staging directory");
    assert!(matches!(err, PackagingError::StagingUnreadable { .. }));

    // Nothing was recorded for the failed packaging attempt.
    assert!(environment.artifacts.is_empty());
}
