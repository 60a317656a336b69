//! Core domain layer for Strata.
//!
//! Pure data: features, layers and the small enumerations attached to them.
//! No I/O and no async; everything here is `Clone + PartialEq` and
//! serde-serializable so layer trees can be loaded from manifests.

pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{feature::Feature, layer::Layer};
pub use error::{DomainError, ErrorCategory};
pub use validation::DomainValidator;
pub use value_objects::{FeatureType, LayerType};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn layer_type_parses_aliases() {
        assert_eq!(LayerType::from_str("lib").unwrap(), LayerType::Library);
        assert_eq!(LayerType::from_str("APP").unwrap(), LayerType::App);
        assert!(matches!(
            LayerType::from_str("desktop"),
            Err(DomainError::UnknownLayerType(_))
        ));
    }

    #[test]
    fn feature_type_order_puts_foundation_first() {
        let mut kinds = vec![
            FeatureType::Unspecified,
            FeatureType::Guides,
            FeatureType::Foundation,
            FeatureType::DevTools,
        ];
        kinds.sort_by_key(|k| k.order());
        assert_eq!(kinds.first(), Some(&FeatureType::Foundation));
        assert_eq!(kinds.last(), Some(&FeatureType::Unspecified));
    }

    #[test]
    fn layer_round_trips_through_json() {
        let layer = Layer::new("root", "demo", "com.example.demo", "app")
            .with_feature("metadata.git")
            .with_layer(Layer::new("core", "core", "com.example.demo", "app"));

        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layer);
    }

    #[test]
    fn validator_delegates_to_layer() {
        let layer = Layer::new("", "", "", "app");
        assert!(DomainValidator::validate_layer(&layer).is_err());
    }
}
