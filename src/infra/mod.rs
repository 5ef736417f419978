//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: configuration reading,
//! credential storage, the content API client, archive packaging, and the
//! interactive prompt.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` are forbidden.

pub mod config;
pub mod credentials;
pub mod gateway;
pub mod packager;
pub mod prompt;

#[allow(unused_imports)]
pub use config::YamlConfigSource;
#[allow(unused_imports)]
pub use credentials::CredentialsStore;
#[allow(unused_imports)]
pub use gateway::{ContentGateway, ContentManifest, PageRef};
#[allow(unused_imports)]
pub use packager::{SystemClock, ZipPackager};
#[allow(unused_imports)]
pub use prompt::DialoguerPrompt;
