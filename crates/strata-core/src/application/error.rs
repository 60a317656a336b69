//! Application layer errors.
//!
//! These errors represent failures while generating, not malformed layer
//! trees. Layer validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during generation.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A feature processor failed while applying or removing its artifacts.
    #[error("Feature '{feature}' failed on layer '{layer}': {reason}")]
    FeatureFailed {
        feature: String,
        layer: String,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A child layer task panicked or could not be joined.
    #[error("Child layer task under '{layer}' failed: {reason}")]
    ChildTaskFailed { layer: String, reason: String },

    /// No template processor is registered under this id.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    /// A layer manifest could not be read or parsed.
    #[error("Invalid layer manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    /// Shared adapter state is unavailable (lock poisoned, etc.).
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FeatureFailed { feature, .. } => vec![
                format!("Feature '{}' could not be generated", feature),
                "Remove the feature from the layer or fix the reported problem".into(),
                "Files written by layers that completed earlier are kept".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ChildTaskFailed { .. } => vec![
                "A child layer aborted unexpectedly".into(),
                "Re-run with -vv to see which feature was being applied".into(),
            ],
            Self::TemplateNotFound { id } => vec![
                format!("No template is registered as '{}'", id),
                "Try: strata list to see available templates".into(),
            ],
            Self::InvalidManifest { path, .. } => vec![
                format!("Check the manifest at {}", path.display()),
                "Manifests must be .toml or .json with a top-level [layer] table".into(),
            ],
            Self::StoreLockError => vec![
                "Internal state became unavailable".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidManifest { .. } => ErrorCategory::Validation,
            Self::FeatureFailed { .. }
            | Self::FilesystemError { .. }
            | Self::ChildTaskFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
