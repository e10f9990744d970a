//! Where new releases come from

use crate::config::UpdateConfig;
use crate::github_releases::{GitHubAsset, GitHubClient, GitHubRelease};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Release feed consulted by the background update check
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Latest published (non-prerelease) release
    async fn latest_release(&self) -> Result<GitHubRelease>;

    /// Fetch an asset of a release
    async fn download(&self, asset: &GitHubAsset) -> Result<Vec<u8>>;
}

/// GitHub releases of the configured repository
pub struct GitHubReleaseSource {
    client: GitHubClient,
}

impl GitHubReleaseSource {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UpdateConfig) -> Result<Self> {
        let client = GitHubClient::new(
            config.owner.clone(),
            config.repo.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleaseSource {
    async fn latest_release(&self) -> Result<GitHubRelease> {
        self.client.get_latest_release().await
    }

    async fn download(&self, asset: &GitHubAsset) -> Result<Vec<u8>> {
        self.client.download_asset(asset).await
    }
}
