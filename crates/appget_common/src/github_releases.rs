// GitHub Releases API Client
//
// Fetches release information and assets for the self-updater

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Duration;

/// GitHub release information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl GitHubRelease {
    /// Version from tag name (strip 'v' prefix)
    pub fn version(&self) -> &str {
        self.tag_name.strip_prefix('v').unwrap_or(&self.tag_name)
    }

    /// Asset whose name matches exactly
    pub fn asset(&self, name: &str) -> Option<&GitHubAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// GitHub API client
pub struct GitHubClient {
    repo_owner: String,
    repo_name: String,
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new(
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("appget/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            http,
        })
    }

    pub fn latest_release_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases/latest",
            self.repo_owner, self.repo_name
        )
    }

    /// Get latest release (excluding prereleases)
    pub async fn get_latest_release(&self) -> Result<GitHubRelease> {
        let url = self.latest_release_url();

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .context("Failed to fetch latest release from GitHub")?;

        if !response.status().is_success() {
            anyhow::bail!("GitHub API returned error: {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse GitHub release JSON")
    }

    /// Download an asset into memory
    pub async fn download_asset(&self, asset: &GitHubAsset) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(&asset.browser_download_url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", asset.name))?;

        if !response.status().is_success() {
            anyhow::bail!("Download of {} failed: {}", asset.name, response.status());
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read {} download", asset.name))?;

        Ok(bytes.to_vec())
    }
}

/// Version comparison (semver-like, optional 'v' prefix)
pub fn compare_versions(current: &str, latest: &str) -> Ordering {
    let current = current.strip_prefix('v').unwrap_or(current);
    let latest = latest.strip_prefix('v').unwrap_or(latest);

    parse_version(current).cmp(&parse_version(latest))
}

/// True when `latest` is newer than `current`
pub fn is_update_available(current: &str, latest: &str) -> bool {
    compare_versions(current, latest) == Ordering::Less
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ParsedVersion {
    major: u32,
    minor: u32,
    patch: u32,
    // A release sorts after any of its prereleases.
    release: bool,
    prerelease: String,
}

fn parse_version(version: &str) -> ParsedVersion {
    let (numbers, prerelease) = match version.split_once('-') {
        Some((numbers, pre)) => (numbers, Some(pre)),
        None => (version, None),
    };

    let nums: Vec<u32> = numbers
        .split('.')
        .map(|s| s.parse().unwrap_or(0))
        .collect();

    ParsedVersion {
        major: nums.first().copied().unwrap_or(0),
        minor: nums.get(1).copied().unwrap_or(0),
        patch: nums.get(2).copied().unwrap_or(0),
        release: prerelease.is_none(),
        prerelease: prerelease.unwrap_or_default().to_string(),
    }
}
