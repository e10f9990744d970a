//! appget common library
//!
//! Shared between the `appget` binary and its tests: the failure taxonomy,
//! configuration, paths, the package repository client and the self-updater.

pub mod app_data;
pub mod config;
pub mod errors;
pub mod github_releases;
pub mod outcome;
pub mod paths;
pub mod repository;
pub mod update;

pub use app_data::{AppDataDirectory, AppDataGuard};
pub use config::{AppGetConfig, LoggingConfig, RepositoryConfig, UpdateConfig};
pub use errors::{CommandError, DomainError, FailureCategory, Severity};
pub use outcome::{suggestion_lines, ExecutionOutcome, EXIT_GENERAL_ERROR, EXIT_SUCCESS};
pub use repository::{HttpRepository, PackageManifest, PackageRepository, PackageSummary};
pub use update::{NoopUpdateService, SelfUpdater, UpdatePhase, UpdateService};
