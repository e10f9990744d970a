//! Command executor
//!
//! ## Files
//! - `view.rs` - print a package manifest
//! - `search.rs` - query the repository
//! - `install.rs` - install/uninstall and the [`Installer`] seam
//!
//! Handlers return [`CommandError`]; classification and display of failures
//! belongs to the orchestrator.

pub mod install;
pub mod search;
pub mod view;

pub use install::{Installer, UnsupportedInstaller};

use crate::cli::{Command, ParsedOptions};
use crate::console::Console;
use appget_common::{CommandError, PackageRepository};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Runs the command selected by the option parser
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, options: &ParsedOptions) -> Result<(), CommandError>;
}

/// Executor backed by a package repository and an installer
pub struct PackageCommandExecutor {
    repository: Arc<dyn PackageRepository>,
    installer: Arc<dyn Installer>,
    console: Arc<dyn Console>,
}

impl PackageCommandExecutor {
    pub fn new(
        repository: Arc<dyn PackageRepository>,
        installer: Arc<dyn Installer>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            repository,
            installer,
            console,
        }
    }
}

#[async_trait]
impl CommandExecutor for PackageCommandExecutor {
    async fn execute(&self, options: &ParsedOptions) -> Result<(), CommandError> {
        debug!("Executing {}", options.command.name());

        let repository = self.repository.as_ref();
        let console = self.console.as_ref();

        match &options.command {
            Command::View { package } => view::run(repository, console, package).await,
            Command::Search { query } => search::run(repository, console, query).await,
            Command::Install { package, version } => {
                install::install(
                    repository,
                    self.installer.as_ref(),
                    console,
                    package,
                    version.as_deref(),
                )
                .await
            }
            Command::Uninstall { package } => {
                install::uninstall(repository, self.installer.as_ref(), console, package).await
            }
        }
    }
}
