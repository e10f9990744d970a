//! Command orchestrator
//!
//! One invocation runs: (debug argument capture) -> update start -> option
//! parsing -> verbosity -> app data guard -> command -> update commit.
//!
//! This is the only place failures are caught. Whatever escapes the command is
//! classified into an [`ExecutionOutcome`], logged at the category's severity
//! and turned into an exit code. The update session is committed only after a
//! successful command.

use crate::cli::{OptionParser, ParsedOptions};
use crate::commands::CommandExecutor;
use crate::console::Console;
use crate::debug::{prompt_for_arguments, DebugContext};
use crate::logging::DiagnosticsSink;
use appget_common::{
    suggestion_lines, AppDataGuard, ExecutionOutcome, FailureCategory, Severity, UpdateService,
    EXIT_GENERAL_ERROR,
};
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// Everything the orchestrator talks to
pub struct Collaborators {
    pub parser: Arc<dyn OptionParser>,
    pub app_data: Arc<dyn AppDataGuard>,
    pub executor: Arc<dyn CommandExecutor>,
    pub updater: Arc<dyn UpdateService>,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
    pub console: Arc<dyn Console>,
    pub debug: Arc<dyn DebugContext>,
}

pub struct Orchestrator {
    parser: Arc<dyn OptionParser>,
    app_data: Arc<dyn AppDataGuard>,
    executor: Arc<dyn CommandExecutor>,
    updater: Arc<dyn UpdateService>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    console: Arc<dyn Console>,
    debug: Arc<dyn DebugContext>,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            parser,
            app_data,
            executor,
            updater,
            diagnostics,
            console,
            debug,
        } = collaborators;

        Self {
            parser,
            app_data,
            executor,
            updater,
            diagnostics,
            console,
            debug,
        }
    }

    /// Run one invocation and return its exit code
    pub async fn run(&self, args: Vec<String>) -> i32 {
        let args = if args.is_empty() && self.debug.is_attached() {
            match prompt_for_arguments(self.console.as_ref()) {
                Ok(args) => args,
                Err(e) => {
                    return self.report(ExecutionOutcome::UnknownFailure {
                        message: format!("Failed to read debug arguments: {}", e),
                    })
                }
            }
        } else {
            args
        };

        // Before parsing, so the check happens even when the command fails
        self.updater.start();

        let Some(options) = self.parser.parse(&args) else {
            debug!("No options parsed, nothing to run");
            return EXIT_GENERAL_ERROR;
        };

        if options.verbose {
            self.diagnostics.enable_verbose();
        }

        let outcome = self.execute(options).await;
        if outcome.is_success() {
            self.updater.commit();
        }

        self.report(outcome)
    }

    async fn execute(&self, options: ParsedOptions) -> ExecutionOutcome {
        if let Err(e) = self.app_data.ensure_app_data_directory_exists() {
            return ExecutionOutcome::UnknownFailure {
                message: format!("Failed to prepare app data directory: {}", e),
            };
        }

        // Own task so a panicking command is contained here. Awaited
        // immediately; no timeout is imposed on the command.
        let executor = Arc::clone(&self.executor);
        let command = tokio::spawn(async move { executor.execute(&options).await });

        match command.await {
            Ok(result) => ExecutionOutcome::from_result(result),
            Err(e) if e.is_panic() => ExecutionOutcome::UnknownFailure {
                message: format!("Command panicked: {}", panic_message(e.into_panic())),
            },
            Err(e) => ExecutionOutcome::UnknownFailure {
                message: format!("Command did not complete: {}", e),
            },
        }
    }

    fn report(&self, outcome: ExecutionOutcome) -> i32 {
        if let Some(category) = outcome.category() {
            debug!(category = category.as_str(), "Command failed");
        }

        match &outcome {
            ExecutionOutcome::Success => {}
            ExecutionOutcome::KnownFailure {
                category,
                message,
                suggestions,
            } => {
                self.diagnostics.record(category.severity(), message);
                if *category == FailureCategory::PackageNotFound {
                    for line in suggestion_lines(suggestions) {
                        self.console.write_line(&line);
                    }
                }
            }
            ExecutionOutcome::UnknownFailure { message } => {
                self.diagnostics.record(Severity::Fatal, message);
            }
        }

        outcome.exit_code()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
