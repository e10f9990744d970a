//! Execution outcome of one command run

use crate::errors::{CommandError, FailureCategory};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for every failure kind, and for an option parse that produced nothing
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Result of running a command. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    KnownFailure {
        category: FailureCategory,
        message: String,
        suggestions: Vec<String>,
    },
    UnknownFailure {
        message: String,
    },
}

impl ExecutionOutcome {
    /// Classify what a command executor returned
    pub fn from_result(result: Result<(), CommandError>) -> Self {
        match result {
            Ok(()) => ExecutionOutcome::Success,
            Err(err) => Self::from_error(err),
        }
    }

    pub fn from_error(err: CommandError) -> Self {
        let category = err.category();
        match err {
            CommandError::PackageNotFound { message, similar } => ExecutionOutcome::KnownFailure {
                category,
                message,
                suggestions: similar,
            },
            CommandError::Domain(e) => ExecutionOutcome::KnownFailure {
                category,
                message: e.to_string(),
                suggestions: Vec::new(),
            },
            e @ CommandError::NotImplemented(_) => ExecutionOutcome::KnownFailure {
                category,
                message: e.to_string(),
                suggestions: Vec::new(),
            },
            // Alternate formatting keeps the whole context chain.
            CommandError::Unclassified(e) => ExecutionOutcome::UnknownFailure {
                message: format!("{:#}", e),
            },
        }
    }

    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            ExecutionOutcome::Success => None,
            ExecutionOutcome::KnownFailure { category, .. } => Some(*category),
            ExecutionOutcome::UnknownFailure { .. } => Some(FailureCategory::Unclassified),
        }
    }

    /// Classification routes diagnostics only; all failures share one exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionOutcome::Success => EXIT_SUCCESS,
            ExecutionOutcome::KnownFailure { .. } | ExecutionOutcome::UnknownFailure { .. } => {
                EXIT_GENERAL_ERROR
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }
}

/// Lines of the suggestions block printed after a package-not-found failure.
///
/// Empty when there is nothing to suggest.
pub fn suggestion_lines(similar: &[String]) -> Vec<String> {
    if similar.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(similar.len() + 2);
    lines.push(String::new());
    lines.push("Suggestions:".to_string());
    lines.extend(similar.iter().map(|pkg| format!("    {}", pkg)));
    lines
}
