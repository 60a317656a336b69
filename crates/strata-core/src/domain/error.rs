// ============================================================================
// domain/error.rs - LAYER TREE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel back out of child tasks)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid layer: {0}")]
    InvalidLayer(String),

    #[error("Layer '{layer}' is missing required field: {field}")]
    MissingRequiredField { layer: String, field: &'static str },

    #[error("Layer '{parent}' declares child '{name}' more than once")]
    DuplicateLayerName { parent: String, name: String },

    #[error("Layer name '{name}' cannot be used as a directory name")]
    UnsafeLayerName { name: String },

    #[error("Feature id cannot be empty (layer '{layer}')")]
    EmptyFeatureId { layer: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Unknown layer type: {0}")]
    UnknownLayerType(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidLayer(msg) => vec![
                "Check the layer definition".into(),
                format!("Details: {}", msg),
            ],
            Self::MissingRequiredField { layer, field } => vec![
                format!("Layer '{}' needs a value for '{}'", layer, field),
                "Child layers inherit 'processor' and 'namespace' from their parent".into(),
            ],
            Self::DuplicateLayerName { parent, name } => vec![
                format!("Rename one of the '{}' children under '{}'", name, parent),
                "Sibling layers are generated into directories named after them".into(),
            ],
            Self::UnsafeLayerName { name } => vec![
                format!("'{}' must be a single relative path segment", name),
                "Avoid '/', '\\', '.' and '..' in layer names".into(),
            ],
            Self::UnknownLayerType(kind) => vec![
                format!("'{}' is not a known layer type", kind),
                "Supported layer types: app, backend, frontend, library".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownLayerType(_) => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
