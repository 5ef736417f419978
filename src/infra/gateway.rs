//! Blocking HTTP client for the per-environment content API.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::environment::EnvironmentDescriptor;
use crate::infra::credentials::CredentialsStore;

/// One page reference in a content manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub revision: u64,
}

/// Content listing returned by `GET <base_uri>/manifest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentManifest {
    #[serde(default)]
    pub pages: Vec<PageRef>,
}

/// Client for one invocation. Bearer tokens are resolved per environment
/// through the credentials store; environments without a stored credential
/// are called unauthenticated.
pub struct ContentGateway {
    agent: ureq::Agent,
    credentials: CredentialsStore,
}

impl ContentGateway {
    #[must_use]
    pub fn new(credentials: CredentialsStore) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self { agent, credentials }
    }

    /// Probe the environment's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the environment is unreachable or unhealthy.
    pub fn ping(&self, environment: &EnvironmentDescriptor) -> Result<()> {
        let url = self.url(environment, "health")?;
        match self.request("GET", &url, environment)?.call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => {
                bail!("health endpoint returned HTTP {code}")
            }
            Err(e) => Err(e).with_context(|| format!("cannot reach {url}")),
        }
    }

    /// Fetch the content manifest.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body is not a
    /// manifest.
    pub fn fetch_manifest(&self, environment: &EnvironmentDescriptor) -> Result<ContentManifest> {
        let body = self.get(environment, "manifest")?;
        serde_json::from_str(&body).context("parsing content manifest")
    }

    /// Fetch one page body as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub fn fetch_page(&self, environment: &EnvironmentDescriptor, id: &str) -> Result<String> {
        self.get(environment, &format!("pages/{id}"))
    }

    /// Fetch the dependency manifest (dependency name → version).
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body is not a
    /// name→version map.
    pub fn fetch_dependencies(
        &self,
        environment: &EnvironmentDescriptor,
    ) -> Result<BTreeMap<String, String>> {
        let body = self.get(environment, "dependencies")?;
        serde_json::from_str(&body).context("parsing dependency manifest")
    }

    /// Pin one dependency to a version.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub fn pin_dependency(
        &self,
        environment: &EnvironmentDescriptor,
        name: &str,
        version: &str,
    ) -> Result<()> {
        let url = self.url(environment, "dependencies")?;
        let payload = serde_json::json!({ "name": name, "version": version });
        let request = self
            .request("PUT", &url, environment)?
            .set("Content-Type", "application/json");
        match request.send_string(&payload.to_string()) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => bail!("pinning {name} returned HTTP {code}"),
            Err(e) => Err(e).with_context(|| format!("cannot reach {url}")),
        }
    }

    /// Execute one script step and return the response body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the step is rejected.
    pub fn execute_step(
        &self,
        environment: &EnvironmentDescriptor,
        method: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<String> {
        let url = self.url(environment, path.trim_start_matches('/'))?;
        let request = self.request(method, &url, environment)?;
        let result = if body.is_null() {
            request.call()
        } else {
            request
                .set("Content-Type", "application/json")
                .send_string(&body.to_string())
        };
        match result {
            Ok(response) => response.into_string().context("reading response"),
            Err(ureq::Error::Status(code, _)) => {
                bail!("{method} {path} returned HTTP {code}")
            }
            Err(e) => Err(e).with_context(|| format!("cannot reach {url}")),
        }
    }

    fn get(&self, environment: &EnvironmentDescriptor, path: &str) -> Result<String> {
        let url = self.url(environment, path)?;
        match self.request("GET", &url, environment)?.call() {
            Ok(response) => response.into_string().context("reading response"),
            Err(ureq::Error::Status(code, _)) => bail!("GET {path} returned HTTP {code}"),
            Err(e) => Err(e).with_context(|| format!("cannot reach {url}")),
        }
    }

    fn url(&self, environment: &EnvironmentDescriptor, path: &str) -> Result<String> {
        let base = environment.base_uri.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "environment '{}' has no base_uri configured",
                environment.app.short_name
            )
        })?;
        Ok(format!("{}/{path}", base.trim_end_matches('/')))
    }

    fn request(
        &self,
        method: &str,
        url: &str,
        environment: &EnvironmentDescriptor,
    ) -> Result<ureq::Request> {
        let request = self
            .agent
            .request(method, url)
            .set("Accept", "application/json")
            .set("User-Agent", concat!("stagehand/", env!("CARGO_PKG_VERSION")));
        let request = match &environment.credentials_id {
            Some(id) => match self.credentials.token(id)? {
                Some(token) => request.set("Authorization", &format!("Bearer {token}")),
                None => request,
            },
            None => request,
        };
        Ok(request)
    }
}
