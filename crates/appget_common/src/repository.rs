//! Package repository client
//!
//! Looks packages up in the appget package API:
//! - `GET {url}/packages/{id}` - manifest, 404 when unknown
//! - `GET {url}/search?q={query}` - ranked matches
//!
//! Unknown ids become [`CommandError::PackageNotFound`] carrying the search
//! hits for the id as suggestions.

use crate::config::RepositoryConfig;
use crate::errors::{CommandError, DomainError};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Manifest for `package_id`
    async fn get(&self, package_id: &str) -> Result<PackageManifest, CommandError>;

    /// Packages matching `query`, best match first
    async fn search(&self, query: &str) -> Result<Vec<PackageSummary>, CommandError>;
}

/// Characters that would change the meaning of `/packages/{id}`
const URL_RESERVED: &[char] = &['/', '\\', '?', '#', '%'];

/// Reject ids that cannot name a package
pub fn validate_package_id(package_id: &str) -> Result<(), DomainError> {
    let invalid = package_id.is_empty()
        || package_id
            .chars()
            .any(|c| c.is_whitespace() || URL_RESERVED.contains(&c));

    if invalid {
        return Err(DomainError::InvalidPackageId(package_id.to_string()));
    }
    Ok(())
}

/// HTTP implementation of [`PackageRepository`]
pub struct HttpRepository {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRepository {
    pub fn from_config(config: &RepositoryConfig) -> Result<Self, DomainError> {
        let base_url = config.url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DomainError::Configuration(format!(
                "repository url '{}' must be http(s)",
                config.url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(format!("appget/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DomainError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { base_url, http })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Option<T>, CommandError> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach package repository for {}", what))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DomainError::Repository(format!("{} returned {}", what, status)).into());
        }

        let body = response
            .json()
            .await
            .map_err(|e| DomainError::Repository(format!("invalid {} response: {}", what, e)))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl PackageRepository for HttpRepository {
    async fn get(&self, package_id: &str) -> Result<PackageManifest, CommandError> {
        validate_package_id(package_id)?;

        let url = format!("{}/packages/{}", self.base_url, package_id);
        let manifest = self
            .fetch_json::<PackageManifest>(self.http.get(&url), package_id)
            .await?;

        match manifest {
            Some(manifest) => Ok(manifest),
            None => {
                let similar = match self.search(package_id).await {
                    Ok(hits) => hits.into_iter().map(|hit| hit.id).collect(),
                    Err(e) => {
                        debug!("No suggestions for {}: {}", package_id, e);
                        Vec::new()
                    }
                };
                Err(CommandError::package_not_found(package_id, similar))
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageSummary>, CommandError> {
        let url = format!("{}/search", self.base_url);
        let request = self.http.get(&url).query(&[("q", query)]);
        let hits = self
            .fetch_json::<Vec<PackageSummary>>(request, "search")
            .await?;
        Ok(hits.unwrap_or_default())
    }
}

/// Stand-in when the repository could not be configured.
///
/// Every lookup reports the configuration problem as a domain failure.
pub struct UnavailableRepository {
    reason: String,
}

impl UnavailableRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> CommandError {
        DomainError::Configuration(self.reason.clone()).into()
    }
}

#[async_trait]
impl PackageRepository for UnavailableRepository {
    async fn get(&self, _package_id: &str) -> Result<PackageManifest, CommandError> {
        Err(self.error())
    }

    async fn search(&self, _query: &str) -> Result<Vec<PackageSummary>, CommandError> {
        Err(self.error())
    }
}
