//! Unified error handling for Strata Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Strata Core operations.
///
/// Errors must be `Send` and `Clone`: a failure raised inside a child layer
/// task is carried back across the join to the caller of the root `process`.
#[derive(Debug, Error, Clone)]
pub enum StrataError {
    /// Errors from the domain layer (malformed layer trees).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (generation failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StrataError {
    /// Shorthand for a processor failure on a given layer.
    pub fn feature_failed(
        feature: impl Into<String>,
        layer: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ApplicationError::FeatureFailed {
            feature: feature.into(),
            layer: layer.into(),
            reason: reason.into(),
        }
        .into()
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Strata".into(),
                "Please report this issue at: https://github.com/cosecruz/strata/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type StrataResult<T> = Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_not_found_is_not_found() {
        let err: StrataError = ApplicationError::TemplateNotFound { id: "x".into() }.into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("strata list")));
    }

    #[test]
    fn domain_validation_maps_to_validation() {
        let err: StrataError = DomainError::InvalidLayer("bad".into()).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn feature_failed_carries_context() {
        let err = StrataError::feature_failed("ci.github-actions", "core", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("ci.github-actions"));
        assert!(msg.contains("core"));
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
