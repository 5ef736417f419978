//! Environment processor ordering, fail-fast, and bookkeeping tests.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use anyhow::Result;
use stagehand::application::orchestrator::process_environments;
use stagehand::application::ports::Operation;
use stagehand::domain::args::RawArgs;
use stagehand::domain::environment::{ArtifactKind, EnvironmentDescriptor};
use stagehand::domain::error::OperationError;

use crate::helpers::{RecordingOperation, set_of};

#[tokio::test]
async fn invokes_once_per_environment_in_resolution_order() {
    let mut environments = set_of(&[
        ("sales", "dev"),
        ("sales", "stage"),
        ("sales", "prod"),
        ("billing", "prod"),
    ]);
    let operation = RecordingOperation::new();
    process_environments(
        "check",
        &mut environments,
        &RawArgs::new("check"),
        &operation,
    )
    .await
    .expect("all succeed");
    assert_eq!(operation.seen(), vec!["dev", "stage", "prod", "prod"]);
}

#[tokio::test]
async fn first_failure_aborts_the_sequence() {
    let mut environments = set_of(&[("sales", "dev"), ("sales", "stage"), ("sales", "prod")]);
    let operation = RecordingOperation::failing_on(1);
    let err = process_environments(
        "export",
        &mut environments,
        &RawArgs::new("export"),
        &operation,
    )
    .await
    .expect_err("first environment fails");
    assert_eq!(operation.seen(), vec!["dev"]);
    assert!(err.downcast_ref::<OperationError>().is_some());
}

#[tokio::test]
async fn failure_wrapping_names_command_and_environment() {
    let mut environments = set_of(&[("sales", "prod")]);
    let operation = RecordingOperation::failing_on(1);
    let err = process_environments(
        "dependency-manager",
        &mut environments,
        &RawArgs::new("dependency-manager"),
        &operation,
    )
    .await
    .expect_err("fails");
    let msg = err.to_string();
    assert!(msg.contains("dependency-manager"), "got: {msg}");
    assert!(msg.contains("'prod'"), "got: {msg}");
    assert!(msg.contains("operation exploded"), "got: {msg}");
}

/// Records an artifact on the descriptor it processes.
struct ArtifactWritingOperation;

impl Operation for ArtifactWritingOperation {
    async fn run(&self, _: &RawArgs, environment: &mut EnvironmentDescriptor) -> Result<()> {
        environment.artifacts.record(
            ArtifactKind::ExecutionLog,
            environment.temp_dir.join("execution.log"),
        );
        Ok(())
    }
}

#[tokio::test]
async fn descriptor_mutations_survive_processing() {
    // The bookkeeping slot is mutated in place and readable afterwards.
    let mut environments = set_of(&[("sales", "dev")]);
    process_environments(
        "execute",
        &mut environments,
        &RawArgs::new("execute"),
        &ArtifactWritingOperation,
    )
    .await
    .expect("runs");
    let expected = PathBuf::from("/tmp/stagehand-tests/sales_dev/execution.log");
    assert_eq!(
        environments.first().artifacts.get(ArtifactKind::ExecutionLog),
        Some(expected.as_path())
    );
}
