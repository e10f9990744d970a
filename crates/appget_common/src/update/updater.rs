//! Self-updater: background check at start, apply on commit

use super::session::{UpdatePhase, UpdateSession};
use super::source::ReleaseSource;
use super::staging::{apply_staged_update, stage_release, StagedUpdate};
use super::UpdateService;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Updates the running appget binary from a [`ReleaseSource`]
///
/// The background task is the only writer of the staged-update descriptor and
/// `commit` its only reader; they meet through a one-shot channel.
pub struct SelfUpdater {
    source: Arc<dyn ReleaseSource>,
    current_version: String,
    staging_dir: PathBuf,
    install_target: PathBuf,
    session: UpdateSession,
    handoff: Mutex<Option<oneshot::Receiver<StagedUpdate>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SelfUpdater {
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        current_version: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
        install_target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            current_version: current_version.into(),
            staging_dir: staging_dir.into(),
            install_target: install_target.into(),
            session: UpdateSession::new(),
            handoff: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// Updater that replaces the currently running executable
    pub fn for_current_exe(
        source: Arc<dyn ReleaseSource>,
        current_version: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate running executable")?;
        Ok(Self::new(source, current_version, staging_dir, exe))
    }

    pub fn phase(&self) -> UpdatePhase {
        self.session.phase()
    }

    /// Wait for the background check to finish
    pub async fn wait_for_check(&self) {
        let task = lock(&self.task).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Update check task ended abnormally: {}", e);
            }
        }
    }
}

impl UpdateService for SelfUpdater {
    fn start(&self) {
        if !self.session.begin() {
            debug!("Update session already {}", self.session.phase().as_str());
            return;
        }

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available, skipping update check");
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        *lock(&self.handoff) = Some(rx);

        let source = Arc::clone(&self.source);
        let current_version = self.current_version.clone();
        let staging_dir = self.staging_dir.clone();

        let task = runtime.spawn(async move {
            match stage_release(source.as_ref(), &current_version, &staging_dir).await {
                Ok(Some(staged)) => {
                    info!("Update v{} staged at {}", staged.version, staged.binary.display());
                    let _ = tx.send(staged);
                }
                Ok(None) => debug!("No update staged"),
                Err(e) => warn!("Background update check failed: {:#}", e),
            }
        });
        *lock(&self.task) = Some(task);
    }

    fn commit(&self) {
        if !self.session.request_commit() {
            debug!(
                "Update commit skipped, session is {}",
                self.session.phase().as_str()
            );
            return;
        }

        let receiver = lock(&self.handoff).take();
        let Some(mut receiver) = receiver else {
            return;
        };

        match receiver.try_recv() {
            Ok(staged) => match apply_staged_update(&staged, &self.install_target) {
                Ok(()) => info!("appget updated to v{}", staged.version),
                Err(e) => error!("Failed to apply update v{}: {:#}", staged.version, e),
            },
            Err(TryRecvError::Empty) => {
                debug!("Update check still running, nothing to apply");
                if let Some(task) = lock(&self.task).take() {
                    task.abort();
                }
            }
            Err(TryRecvError::Closed) => debug!("No update to apply"),
        }
    }
}

impl Drop for SelfUpdater {
    fn drop(&mut self) {
        if self.session.abandon() {
            debug!("Update session abandoned");
        }
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
