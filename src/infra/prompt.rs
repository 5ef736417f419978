//! Interactive implementation of the `ProceedPrompt` port.

use anyhow::Result;

use crate::application::ports::ProceedPrompt;
use crate::domain::args::RawArgs;
use crate::domain::environment::EnvironmentSet;
use crate::domain::error::PromptError;
use crate::output::OutputContext;

/// Terminal confirmation prompt backed by dialoguer.
pub struct DialoguerPrompt<'a> {
    out: &'a OutputContext,
}

impl<'a> DialoguerPrompt<'a> {
    #[must_use]
    pub fn new(out: &'a OutputContext) -> Self {
        Self { out }
    }
}

impl ProceedPrompt for DialoguerPrompt<'_> {
    #[allow(clippy::unused_async)] // port contract: prompting is a suspension point
    async fn confirm(&self, environments: &EnvironmentSet, args: &RawArgs) -> Result<bool> {
        self.out
            .header(&format!("{} will run against:", args.command()));
        for environment in environments.iter() {
            let target = environment.base_uri.as_deref().unwrap_or("(local)");
            self.out.kv(
                &format!("{} ({})", environment.app.name, environment.app.short_name),
                target,
            );
        }

        let question = format!(
            "Proceed with {} across {} environment(s)?",
            args.command(),
            environments.len()
        );
        let answer = dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| PromptError::Unavailable(e.to_string()))?;
        Ok(answer)
    }
}
