// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Feature configuration
    // ========================================================================
    #[error("Unknown feature '{name}'")]
    UnknownFeature { name: String },

    #[error("Invalid feature configuration: {reason}")]
    InvalidFeatureConfig { reason: String },

    // ========================================================================
    // Generator identifiers
    // ========================================================================
    #[error("Unknown synthesis function '{name}'")]
    UnknownSynthesisFunction { name: String },

    #[error("Unknown template '{name}'")]
    UnknownTemplate { name: String },

    // ========================================================================
    // Schema shape
    // ========================================================================
    #[error("Schema root must be a directory")]
    RootNotDirectory,

    #[error("Invalid schema key at '{path}': {reason}")]
    InvalidSchemaKey { path: String, reason: String },

    #[error("File node '{path}' cannot have children")]
    FileWithChildren { path: String },

    // ========================================================================
    // Package and output structure
    // ========================================================================
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("Package structure is empty")]
    EmptyStructure,

    #[error("Duplicate path in package structure: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Invalid ecosystem manifest: {reason}")]
    InvalidManifest { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownFeature { name } => vec![
                format!("'{}' is not a known feature", name),
                "Known features: core, npm, ts, vitest, react, node, vite, cue".into(),
            ],
            Self::InvalidFeatureConfig { reason } => vec![
                format!("Could not read the feature configuration: {}", reason),
                "Expected: { \"features\": { name: { \"dependencies\": [..] } }, \"presets\": { name: [..] } }".into(),
            ],
            Self::UnknownSynthesisFunction { name } | Self::UnknownTemplate { name } => vec![
                format!("No backend implementation is registered under '{}'", name),
                "Check the schema entry that references it".into(),
            ],
            Self::InvalidPackageName { name, reason } => vec![
                format!("Package name '{}' is invalid: {}", name, reason),
                "Use lowercase letters, digits, '-', '_' and '.'".into(),
                "Examples: scaffold, my-lib, client.utils".into(),
            ],
            Self::InvalidManifest { reason } => vec![
                format!("The ecosystem manifest could not be parsed: {}", reason),
                "Expected a JSON object with a \"packages\" map".into(),
            ],
            _ => vec!["This indicates a malformed schema; please report it".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownFeature { .. }
            | Self::InvalidFeatureConfig { .. }
            | Self::InvalidPackageName { .. }
            | Self::InvalidManifest { .. } => ErrorCategory::Validation,
            Self::UnknownSynthesisFunction { .. } | Self::UnknownTemplate { .. } => {
                ErrorCategory::NotFound
            }
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_names_identifier() {
        let err = DomainError::UnknownTemplate {
            name: "readme.md.ejs".into(),
        };
        assert_eq!(err.to_string(), "Unknown template 'readme.md.ejs'");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions()[0].contains("readme.md.ejs"));
    }

    #[test]
    fn schema_shape_errors_are_internal() {
        assert_eq!(
            DomainError::RootNotDirectory.category(),
            ErrorCategory::Internal
        );
    }
}
