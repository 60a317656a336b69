use crate::domain::{entities::Layer, error::DomainError};

/// Centralized domain validation.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_layer(layer: &Layer) -> Result<(), DomainError> {
        layer.validate()
    }
}
