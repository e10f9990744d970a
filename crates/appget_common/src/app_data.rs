//! Application data directory guard

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Makes sure the local state directory exists before a command runs
pub trait AppDataGuard: Send + Sync {
    fn ensure_app_data_directory_exists(&self) -> io::Result<()>;
}

/// Filesystem-backed guard rooted at the appget data directory
#[derive(Debug, Clone)]
pub struct AppDataDirectory {
    root: PathBuf,
}

impl AppDataDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Guard for [`crate::paths::data_dir`]
    pub fn from_env() -> Self {
        Self::new(crate::paths::data_dir())
    }
}

impl AppDataGuard for AppDataDirectory {
    fn ensure_app_data_directory_exists(&self) -> io::Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }

        debug!("Creating app data directory {}", self.root.display());
        fs::create_dir_all(&self.root)
    }
}
