//! Domain layer — pure value types and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod args;
pub mod environment;
pub mod error;

#[allow(unused_imports)]
pub use args::RawArgs;
#[allow(unused_imports)]
pub use environment::{
    AppIdentity, ArtifactKind, ArtifactRegistry, EnvironmentDescriptor, EnvironmentSet, NO_ENV,
    validate_short_name,
};
#[allow(unused_imports)]
pub use error::{ConfigurationError, OperationError, PackagingError, PromptError};
