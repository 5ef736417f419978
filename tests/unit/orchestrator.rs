//! Dispatch pipeline tests: usage short-circuit, gating, fail-fast.

#![allow(clippy::expect_used)]

use stagehand::application::orchestrator::{self, CommandOutcome, handle_command};
use stagehand::domain::args::RawArgs;
use stagehand::domain::error::OperationError;

use crate::helpers::{
    ConfigNotExpected, FailingConfig, FixedPrompt, PromptNotExpected, RecordingOperation,
    StaticConfig, set_of,
};

#[tokio::test]
async fn bare_command_short_circuits_before_everything() {
    // A bare command must not resolve, prompt, or invoke the operation;
    // the not-expected mocks bail if reached.
    let operation = RecordingOperation::new();
    let outcome = handle_command(
        &orchestrator::EXPORT,
        &RawArgs::new("export"),
        &ConfigNotExpected,
        &PromptNotExpected,
        &operation,
    )
    .await
    .expect("usage short-circuit");
    assert_eq!(outcome, CommandOutcome::UsageShown);
    assert_eq!(operation.calls(), 0);
}

#[tokio::test]
async fn noprompt_runs_every_environment_in_order() {
    let config = StaticConfig(set_of(&[("sales", "dev"), ("sales", "prod")]));
    let operation = RecordingOperation::new();
    let outcome = handle_command(
        &orchestrator::EXPORT,
        &RawArgs::new("export").with_noprompt(true),
        &config,
        &PromptNotExpected,
        &operation,
    )
    .await
    .expect("runs");
    assert_eq!(outcome, CommandOutcome::Completed);
    assert_eq!(operation.seen(), vec!["dev", "prod"]);
}

#[tokio::test]
async fn declined_confirmation_is_a_silent_noop() {
    let config = StaticConfig(set_of(&[("sales", "dev"), ("sales", "prod")]));
    let prompt = FixedPrompt::new(false);
    let operation = RecordingOperation::new();
    let outcome = handle_command(
        &orchestrator::CHECK,
        &RawArgs::new("check").with_option("environment", "dev,prod"),
        &config,
        &prompt,
        &operation,
    )
    .await
    .expect("declined is not an error");
    assert_eq!(outcome, CommandOutcome::Declined);
    assert_eq!(prompt.calls(), 1);
    assert_eq!(operation.calls(), 0);
}

#[tokio::test]
async fn accepted_confirmation_processes_every_environment() {
    let config = StaticConfig(set_of(&[("sales", "dev"), ("sales", "prod")]));
    let prompt = FixedPrompt::new(true);
    let operation = RecordingOperation::new();
    let outcome = handle_command(
        &orchestrator::CHECK,
        &RawArgs::new("check").with_option("environment", "dev,prod"),
        &config,
        &prompt,
        &operation,
    )
    .await
    .expect("runs");
    assert_eq!(outcome, CommandOutcome::Completed);
    assert_eq!(operation.calls(), 2);
}

#[tokio::test]
async fn resolution_failure_propagates_before_any_operation() {
    let operation = RecordingOperation::new();
    let err = handle_command(
        &orchestrator::EXPORT,
        &RawArgs::new("export").with_noprompt(true),
        &FailingConfig,
        &PromptNotExpected,
        &operation,
    )
    .await
    .expect_err("resolution fails");
    assert!(err.to_string().contains("no environments"), "got: {err}");
    assert_eq!(operation.calls(), 0);
}

#[tokio::test]
async fn operation_failure_stops_remaining_environments() {
    let config = StaticConfig(set_of(&[
        ("sales", "dev"),
        ("sales", "stage"),
        ("sales", "prod"),
    ]));
    let operation = RecordingOperation::failing_on(2);
    let err = handle_command(
        &orchestrator::EXPORT,
        &RawArgs::new("export").with_noprompt(true),
        &config,
        &PromptNotExpected,
        &operation,
    )
    .await
    .expect_err("second environment fails");

    // Fail-fast: prod is never reached.
    assert_eq!(operation.seen(), vec!["dev", "stage"]);

    // The diagnostic names the command and the failing environment.
    let failure = err
        .downcast_ref::<OperationError>()
        .expect("operation error");
    let msg = failure.to_string();
    assert!(msg.contains("export"), "got: {msg}");
    assert!(msg.contains("'stage'"), "got: {msg}");
}
