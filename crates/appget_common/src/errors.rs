//! Failure taxonomy for command execution
//!
//! Every failure that escapes a command ends up in exactly one
//! [`FailureCategory`]. The categories are ordered most-specific-first:
//! package-not-found, domain, not-implemented, unclassified.

use thiserror::Error;

/// Recognized application-level failures
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid package id '{0}'")]
    InvalidPackageId(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Package repository error: {0}")]
    Repository(String),
}

/// Failure raised by a command executor
#[derive(Error, Debug)]
pub enum CommandError {
    /// The requested package id could not be matched.
    ///
    /// `similar` holds candidate ids in the order the repository returned them.
    #[error("{message}")]
    PackageNotFound { message: String, similar: Vec<String> },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl CommandError {
    /// Build a package-not-found failure for `package_id`
    pub fn package_not_found(package_id: &str, similar: Vec<String>) -> Self {
        CommandError::PackageNotFound {
            message: format!("Package '{}' couldn't be found", package_id),
            similar,
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            CommandError::PackageNotFound { .. } => FailureCategory::PackageNotFound,
            CommandError::Domain(_) => FailureCategory::Domain,
            CommandError::NotImplemented(_) => FailureCategory::NotImplemented,
            CommandError::Unclassified(_) => FailureCategory::Unclassified,
        }
    }
}

/// Classification of a failure, used to route logging and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureCategory {
    PackageNotFound,
    Domain,
    NotImplemented,
    Unclassified,
}

/// Log severity a failure category is reported at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warn,
    Error,
    Fatal,
}

impl FailureCategory {
    /// Only unclassified failures escalate above error.
    pub fn severity(&self) -> Severity {
        match self {
            FailureCategory::PackageNotFound => Severity::Warn,
            FailureCategory::Domain | FailureCategory::NotImplemented => Severity::Error,
            FailureCategory::Unclassified => Severity::Fatal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::PackageNotFound => "package_not_found",
            FailureCategory::Domain => "domain",
            FailureCategory::NotImplemented => "not_implemented",
            FailureCategory::Unclassified => "unclassified",
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_ordered_most_specific_first() {
        let mut categories = vec![
            FailureCategory::Unclassified,
            FailureCategory::NotImplemented,
            FailureCategory::PackageNotFound,
            FailureCategory::Domain,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                FailureCategory::PackageNotFound,
                FailureCategory::Domain,
                FailureCategory::NotImplemented,
                FailureCategory::Unclassified,
            ]
        );
    }

    #[test]
    fn test_only_unclassified_is_fatal() {
        assert_eq!(FailureCategory::PackageNotFound.severity(), Severity::Warn);
        assert_eq!(FailureCategory::Domain.severity(), Severity::Error);
        assert_eq!(FailureCategory::NotImplemented.severity(), Severity::Error);
        assert_eq!(FailureCategory::Unclassified.severity(), Severity::Fatal);
    }

    #[test]
    fn test_error_category_mapping() {
        let err = CommandError::package_not_found("firefox", vec![]);
        assert_eq!(err.category(), FailureCategory::PackageNotFound);
        assert_eq!(err.to_string(), "Package 'firefox' couldn't be found");

        let err: CommandError = DomainError::Unsupported("portable".to_string()).into();
        assert_eq!(err.category(), FailureCategory::Domain);

        let err: CommandError = anyhow::anyhow!("boom").into();
        assert_eq!(err.category(), FailureCategory::Unclassified);
        assert_eq!(err.to_string(), "boom");
    }
}
