//! Confirmation gate decision-order tests.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use stagehand::application::orchestrator::decide_proceed;
use stagehand::domain::args::RawArgs;
use stagehand::domain::environment::EnvironmentSet;

use crate::helpers::{FixedPrompt, PromptNotExpected, set_of};

#[tokio::test]
async fn noprompt_bypasses_the_prompt() {
    let environments = set_of(&[("sales", "dev"), ("sales", "prod")]);
    let args = RawArgs::new("export").with_noprompt(true);
    let proceed = decide_proceed(&environments, &args, &PromptNotExpected)
        .await
        .expect("gate");
    assert!(proceed);
}

#[tokio::test]
async fn envless_singleton_never_prompts() {
    let environments = EnvironmentSet::envless(PathBuf::from("/tmp/local"));
    let args = RawArgs::new("credentials-manager").with_option("list", "true");
    let proceed = decide_proceed(&environments, &args, &PromptNotExpected)
        .await
        .expect("gate");
    assert!(proceed);
}

#[tokio::test]
async fn envless_singleton_skips_prompt_even_with_noprompt() {
    let environments = EnvironmentSet::envless(PathBuf::from("/tmp/local"));
    let args = RawArgs::new("credentials-manager")
        .with_option("list", "true")
        .with_noprompt(true);
    let proceed = decide_proceed(&environments, &args, &PromptNotExpected)
        .await
        .expect("gate");
    assert!(proceed);
}

#[tokio::test]
async fn multi_environment_run_asks_the_prompt() {
    let environments = set_of(&[("sales", "dev"), ("sales", "prod")]);
    let args = RawArgs::new("export").with_option("environment", "dev,prod");

    let declined = FixedPrompt::new(false);
    assert!(
        !decide_proceed(&environments, &args, &declined)
            .await
            .expect("gate")
    );
    assert_eq!(declined.calls(), 1);

    let accepted = FixedPrompt::new(true);
    assert!(
        decide_proceed(&environments, &args, &accepted)
            .await
            .expect("gate")
    );
    assert_eq!(accepted.calls(), 1);
}

#[tokio::test]
async fn single_real_environment_still_prompts() {
    // Only the no-env sentinel skips confirmation; one real target does not.
    let environments = set_of(&[("sales", "prod")]);
    let args = RawArgs::new("export").with_option("environment", "prod");
    let prompt = FixedPrompt::new(true);
    let proceed = decide_proceed(&environments, &args, &prompt)
        .await
        .expect("gate");
    assert!(proceed);
    assert_eq!(prompt.calls(), 1);
}
