use std::sync::Arc;

use strata_core::{
    domain::LayerType,
    engine::{FeatureProvider, TemplateGenerator},
};

/// Generator with no features of its own.
///
/// Useful as a grouping layer: it still gets the metadata dependencies, so
/// its directory carries a README listing its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppGenerator;

impl AppGenerator {
    pub const ID: &'static str = "app";
}

impl TemplateGenerator for AppGenerator {
    fn id(&self) -> &str {
        Self::ID
    }

    fn layer_type(&self) -> LayerType {
        LayerType::App
    }

    fn create_providers(&self) -> Vec<Arc<dyn FeatureProvider>> {
        Vec::new()
    }
}
