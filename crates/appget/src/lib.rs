//! appget - command-line application installer
//!
//! Process-level wiring lives here; `main.rs` only collects arguments and
//! exits with the code [`run_process`] returns.

pub mod cli;
pub mod commands;
pub mod console;
pub mod debug;
pub mod logging;
pub mod orchestrator;

use appget_common::repository::UnavailableRepository;
use appget_common::{
    paths, AppDataDirectory, AppGetConfig, DomainError, HttpRepository, PackageRepository,
};
use appget_common::update::update_service_from_config;
use cli::{ClapOptionParser, VERSION};
use commands::{PackageCommandExecutor, UnsupportedInstaller};
use console::{Console, StdConsole};
use debug::DebugContext;
use orchestrator::{Collaborators, Orchestrator};
use std::sync::Arc;
use tracing::warn;

/// Build the production collaborators and run
pub async fn run_process(args: Vec<String>) -> i32 {
    let (config, config_error) = match AppGetConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppGetConfig::default(), Some(e)),
    };
    let diagnostics = Arc::new(logging::init(&config.logging));
    if let Some(e) = config_error {
        warn!("{}, using defaults", e);
    }
    let console: Arc<dyn Console> = Arc::new(StdConsole);

    let repository: Arc<dyn PackageRepository> = match HttpRepository::from_config(&config.repository)
    {
        Ok(repository) => Arc::new(repository),
        Err(DomainError::Configuration(reason)) => Arc::new(UnavailableRepository::new(reason)),
        Err(e) => Arc::new(UnavailableRepository::new(e.to_string())),
    };
    let executor = Arc::new(PackageCommandExecutor::new(
        repository,
        Arc::new(UnsupportedInstaller),
        Arc::clone(&console),
    ));

    let updater = update_service_from_config(&config.update, VERSION, paths::update_staging_dir());

    #[cfg(debug_assertions)]
    let debug_context: Arc<dyn DebugContext> = Arc::new(debug::TracerDebugContext);
    #[cfg(not(debug_assertions))]
    let debug_context: Arc<dyn DebugContext> = Arc::new(debug::Detached);

    let orchestrator = Orchestrator::new(Collaborators {
        parser: Arc::new(ClapOptionParser),
        app_data: Arc::new(AppDataDirectory::from_env()),
        executor,
        updater,
        diagnostics,
        console,
        debug: Arc::clone(&debug_context),
    });

    #[cfg(debug_assertions)]
    let exit_code = debug::run_with_rerun(&orchestrator, debug_context.as_ref(), args).await;
    #[cfg(not(debug_assertions))]
    let exit_code = orchestrator.run(args).await;

    exit_code
}
