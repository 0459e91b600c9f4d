//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The generator registry does not match the schema's file paths.
    #[error("Generator registry does not match the schema ({} missing, {} extra)", .missing.len(), .extra.len())]
    RegistryIncomplete {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// Dispatch to a path nothing is registered for.
    #[error("No generator registered for '{path}'")]
    MissingGenerator { path: String },

    /// A generator ran and failed.
    #[error("Generating '{path}' failed: {reason}")]
    GeneratorFailed { path: String, reason: String },

    /// An external process could not be started or exited unsuccessfully.
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Package already exists at target location.
    #[error("Package already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Nothing to refresh at the given location.
    #[error("No package found at {path}")]
    PackageNotFound { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RegistryIncomplete { missing, extra } => {
                let mut out = Vec::new();
                for path in missing {
                    out.push(format!("missing generator: {}", path));
                }
                for path in extra {
                    out.push(format!("generator without schema entry: {}", path));
                }
                out.push("Register exactly one generator per schema file path".into());
                out
            }
            Self::MissingGenerator { path } => vec![
                format!("'{}' is not a file path of the schema", path),
                "Run: scaffold schema to list the known file paths".into(),
            ],
            Self::GeneratorFailed { path, .. } => vec![
                format!("The generator for '{}' reported an error", path),
                "Re-run with -vv for details".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Check that `{}` runs in a shell", command),
                "Make sure the tool is installed and on PATH".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different package name".into(),
                "Or use: scaffold refresh to update it".into(),
            ],
            Self::PackageNotFound { path } => vec![
                format!("Nothing at: {}", path.display()),
                "Pass the package directory: scaffold refresh <PATH>".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Partial output may remain at {}; remove it manually",
                path.display()
            )],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RegistryIncomplete { .. } | Self::MissingGenerator { .. } => {
                ErrorCategory::Internal
            }
            Self::GeneratorFailed { .. } | Self::CommandFailed { .. } => ErrorCategory::External,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::PackageNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
