//! Raw command-line arguments as seen by the dispatch pipeline.

use std::collections::BTreeMap;

/// The parsed arguments of a single invocation.
///
/// Carries the command name, the `--noprompt` flag, and whatever
/// command-specific options the user actually set. Options that were not
/// given are absent from the map, which is what makes
/// [`RawArgs::is_command_only`] meaningful. Immutable once built — the
/// orchestrator and the operations only read it.
#[derive(Debug, Clone)]
pub struct RawArgs {
    command: String,
    noprompt: bool,
    options: BTreeMap<String, String>,
}

impl RawArgs {
    /// Start a record for `command` with no options set.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            noprompt: false,
            options: BTreeMap::new(),
        }
    }

    /// Set the `--noprompt` flag.
    #[must_use]
    pub fn with_noprompt(mut self, noprompt: bool) -> Self {
        self.noprompt = noprompt;
        self
    }

    /// Record a command-specific option. Call only for options the user set.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The command name this invocation addresses.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether `--noprompt` was given.
    #[must_use]
    pub fn noprompt(&self) -> bool {
        self.noprompt
    }

    /// The value of a command-specific option, if the user set it.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Whether a command-specific option was set at all.
    #[must_use]
    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// True when the invocation carried nothing but the command itself.
    ///
    /// This is the usage short-circuit condition: no option set and no
    /// `--noprompt`.
    #[must_use]
    pub fn is_command_only(&self) -> bool {
        !self.noprompt && self.options.is_empty()
    }
}
