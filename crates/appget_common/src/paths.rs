//! Path helpers for appget
//!
//! Priority for each directory:
//! 1. Explicit environment override (`APPGET_DATA_DIR`, `APPGET_CONFIG_DIR`)
//! 2. Platform directory from `dirs` joined with `appget`
//! 3. `.appget` under the system temp dir (no home directory available)

use std::path::PathBuf;

const APP_DIR_NAME: &str = "appget";

pub const DATA_DIR_ENV: &str = "APPGET_DATA_DIR";
pub const CONFIG_DIR_ENV: &str = "APPGET_CONFIG_DIR";

/// Local application data directory
pub fn data_dir() -> PathBuf {
    if let Some(path) = env_path(DATA_DIR_ENV) {
        return path;
    }

    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(fallback_dir)
}

/// Configuration directory
pub fn config_dir() -> PathBuf {
    if let Some(path) = env_path(CONFIG_DIR_ENV) {
        return path;
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(fallback_dir)
}

/// Configuration file path
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where downloaded updates wait to be applied
pub fn update_staging_dir() -> PathBuf {
    data_dir().join("updates")
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn fallback_dir() -> PathBuf {
    std::env::temp_dir().join(format!(".{}", APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        std::env::set_var(DATA_DIR_ENV, "/tmp/appget-test-data");
        std::env::set_var(CONFIG_DIR_ENV, "/tmp/appget-test-config");

        assert_eq!(data_dir(), PathBuf::from("/tmp/appget-test-data"));
        assert_eq!(
            update_staging_dir(),
            PathBuf::from("/tmp/appget-test-data/updates")
        );
        assert_eq!(
            config_file(),
            PathBuf::from("/tmp/appget-test-config/config.toml")
        );

        std::env::remove_var(DATA_DIR_ENV);
        std::env::remove_var(CONFIG_DIR_ENV);
    }

    #[test]
    fn test_empty_override_ignored() {
        assert_eq!(env_path("APPGET_TEST_UNSET_VARIABLE"), None);
    }
}
