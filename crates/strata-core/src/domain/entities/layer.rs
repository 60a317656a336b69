use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::feature::Feature, error::DomainError};

/// A node in the generated-project tree.
///
/// Each layer corresponds to one generated module or folder. The declared
/// feature list does not need to be exhaustive: mandatory features are filled
/// in at processing time without being written back onto the layer.
///
/// Children are reference counted so that processing can hand each child
/// layer to its own task without copying the subtree below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub namespace: String,
    /// Selects the template processor that handles this layer.
    pub processor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub layers: Vec<Arc<Layer>>,
}

impl Layer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        processor_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            namespace: namespace.into(),
            processor_id: processor_id.into(),
            description: None,
            features: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<Feature>) -> Self {
        self.features.push(feature.into());
        self
    }

    pub fn with_features<I, F>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Feature>,
    {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(Arc::new(layer));
        self
    }

    pub fn has_feature(&self, id: &str) -> bool {
        self.features.iter().any(|f| f.id == id)
    }

    /// Display name, falling back to the id for unnamed layers.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Number of layers in this subtree, including `self`.
    pub fn tree_size(&self) -> usize {
        1 + self.layers.iter().map(|child| child.tree_size()).sum::<usize>()
    }

    /// Validate this layer and its whole subtree.
    ///
    /// The root may be unnamed (it maps onto the output directory itself);
    /// every child name becomes a directory and must be a single, plain path
    /// segment unique among its siblings.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                layer: self.display_name().to_string(),
                field: "id",
            });
        }

        if self.processor_id.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                layer: self.display_name().to_string(),
                field: "processor_id",
            });
        }

        if self.features.iter().any(|f| f.id.trim().is_empty()) {
            return Err(DomainError::EmptyFeatureId {
                layer: self.display_name().to_string(),
            });
        }

        let mut seen = HashSet::new();
        for child in &self.layers {
            if !is_safe_segment(&child.name) {
                return Err(DomainError::UnsafeLayerName {
                    name: child.name.clone(),
                });
            }
            if !seen.insert(child.name.as_str()) {
                return Err(DomainError::DuplicateLayerName {
                    parent: self.display_name().to_string(),
                    name: child.name.clone(),
                });
            }
            child.validate()?;
        }

        Ok(())
    }
}

fn is_safe_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(id: &str, name: &str) -> Layer {
        Layer::new(id, name, "com.example", "app")
    }

    #[test]
    fn unnamed_root_is_valid() {
        assert!(layer("root", "").validate().is_ok());
    }

    #[test]
    fn missing_processor_is_rejected() {
        let result = Layer::new("root", "", "", "").validate();
        assert!(matches!(
            result,
            Err(DomainError::MissingRequiredField {
                field: "processor_id",
                ..
            })
        ));
    }

    #[test]
    fn duplicate_children_are_rejected() {
        let root = layer("root", "")
            .with_layer(layer("a", "core"))
            .with_layer(layer("b", "core"));

        assert!(matches!(
            root.validate(),
            Err(DomainError::DuplicateLayerName { .. })
        ));
    }

    #[test]
    fn child_names_must_be_plain_segments() {
        for bad in ["", "..", "a/b", ".hidden", "a\\b"] {
            let root = layer("root", "").with_layer(layer("c", bad));
            assert!(
                matches!(root.validate(), Err(DomainError::UnsafeLayerName { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn validation_recurses_into_grandchildren() {
        let root = layer("root", "").with_layer(
            layer("mid", "mid").with_layer(Layer::new("leaf", "leaf", "", "")),
        );
        assert!(root.validate().is_err());
    }

    #[test]
    fn tree_size_counts_every_layer() {
        let root = layer("root", "")
            .with_layer(layer("a", "a").with_layer(layer("a1", "a1")))
            .with_layer(layer("b", "b"));
        assert_eq!(root.tree_size(), 4);
    }
}
