//! appget configuration
//!
//! Configuration lives in `<config dir>/config.toml` (see [`crate::paths`]).
//! Every section and field is optional; a missing file means defaults.

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Setting this variable (to anything) disables the self-updater
pub const NO_UPDATE_ENV: &str = "APPGET_NO_UPDATE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppGetConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub update: UpdateConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `APPGET_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Self-update settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// GitHub owner of the release feed
    #[serde(default = "default_update_owner")]
    pub owner: String,

    /// GitHub repository of the release feed
    #[serde(default = "default_update_repo")]
    pub repo: String,

    #[serde(default = "default_update_timeout")]
    pub request_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_update_owner() -> String {
    "appget".to_string()
}

fn default_update_repo() -> String {
    "appget".to_string()
}

fn default_update_timeout() -> u64 {
    10
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            owner: default_update_owner(),
            repo: default_update_repo(),
            request_timeout_secs: default_update_timeout(),
        }
    }
}

impl UpdateConfig {
    /// Config flag combined with the `APPGET_NO_UPDATE` kill switch
    pub fn is_effectively_enabled(&self) -> bool {
        self.enabled && std::env::var_os(NO_UPDATE_ENV).is_none()
    }
}

/// Package repository settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_repository_url")]
    pub url: String,

    #[serde(default = "default_repository_timeout")]
    pub request_timeout_secs: u64,
}

fn default_repository_url() -> String {
    "https://api.appget.net/v1".to_string()
}

fn default_repository_timeout() -> u64 {
    30
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: default_repository_url(),
            request_timeout_secs: default_repository_timeout(),
        }
    }
}

impl AppGetConfig {
    /// Load from the default config file location
    pub fn load() -> Result<Self, DomainError> {
        Self::load_from(&crate::paths::config_file())
    }

    /// Load from `path`. A missing file means defaults; an unparsable one is
    /// an error so the caller can report it once logging is up.
    pub fn load_from(path: &Path) -> Result<Self, DomainError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Ok(Self::default()),
        };

        toml::from_str(&content).map_err(|e| {
            DomainError::Configuration(format!(
                "invalid config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}
