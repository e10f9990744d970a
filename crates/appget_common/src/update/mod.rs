//! Self-update lifecycle
//!
//! `start()` kicks off a background check for a newer release and stages it;
//! `commit()` applies whatever was staged. The orchestrator only commits after
//! the requested command succeeded, so a failed run never changes the binary.
//!
//! - `session.rs` - per-process `Idle -> Started -> CommitRequested | Abandoned`
//! - `source.rs` - release feed abstraction (GitHub in production)
//! - `staging.rs` - download, checksum verification, atomic replace
//! - `updater.rs` - [`SelfUpdater`] tying the above together

pub mod session;
pub mod source;
pub mod staging;
pub mod updater;

pub use session::{UpdatePhase, UpdateSession};
pub use source::{GitHubReleaseSource, ReleaseSource};
pub use staging::{platform_asset_name, StagedUpdate, CHECKSUMS_ASSET};
pub use updater::SelfUpdater;

use crate::config::UpdateConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Update lifecycle as seen by the orchestrator. Neither call can fail.
pub trait UpdateService: Send + Sync {
    /// Begin a background check. Must not block.
    fn start(&self);

    /// Apply a staged update, if there is one.
    fn commit(&self);
}

/// Used when updates are disabled or cannot be set up
#[derive(Debug, Default)]
pub struct NoopUpdateService;

impl UpdateService for NoopUpdateService {
    fn start(&self) {
        debug!("Self-update disabled");
    }

    fn commit(&self) {}
}

/// Production update service for `config`
pub fn update_service_from_config(
    config: &UpdateConfig,
    current_version: &str,
    staging_dir: PathBuf,
) -> Arc<dyn UpdateService> {
    if !config.is_effectively_enabled() {
        return Arc::new(NoopUpdateService);
    }

    let source = match GitHubReleaseSource::from_config(config) {
        Ok(source) => source,
        Err(e) => {
            warn!("Self-update unavailable: {:#}", e);
            return Arc::new(NoopUpdateService);
        }
    };

    match SelfUpdater::for_current_exe(Arc::new(source), current_version, staging_dir) {
        Ok(updater) => Arc::new(updater),
        Err(e) => {
            warn!("Self-update unavailable: {:#}", e);
            Arc::new(NoopUpdateService)
        }
    }
}
