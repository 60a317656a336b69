//! Layer-tree manifest loader.
//!
//! Reads a TOML or JSON manifest describing a tree of layers and converts it
//! into a domain [`Layer`] ready for the generation service.
//!
//! # `strata.toml` format
//!
//! ```toml
//! name        = "shop"                 # directory name of the layer (required)
//! id          = "shop"                 # optional; a random id is assigned otherwise
//! namespace   = "com.example.shop"     # optional; inherited from the parent
//! processor   = "rust-workspace"       # optional; inherited from the parent
//! description = "Online shop"          # optional
//!
//! # Plain ids, or tables with a title/description
//! features = ["quality.rustfmt", { id = "license.mit", title = "MIT" }]
//!
//! [[layers]]
//! name     = "core"
//! features = ["quality.clippy"]
//! ```
//!
//! The root layer falls back to the loader's default processor (`app`) and to
//! an empty namespace.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use strata_core::{
    application::ApplicationError,
    domain::{Feature, Layer},
    error::StrataResult,
};

/// Processor id used for a root layer that names none.
pub const DEFAULT_PROCESSOR: &str = "app";

/// Deserialised representation of one layer of a manifest.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayerManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, alias = "processor_id", skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerManifest>,
}

/// A feature reference: a bare id or a table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FeatureEntry {
    Id(String),
    Detailed {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl From<&FeatureEntry> for Feature {
    fn from(entry: &FeatureEntry) -> Self {
        match entry {
            FeatureEntry::Id(id) => Feature::new(id.clone()),
            FeatureEntry::Detailed {
                id,
                title,
                description,
            } => Feature {
                id: id.clone(),
                title: title.clone(),
                description: description.clone(),
            },
        }
    }
}

impl From<&Layer> for LayerManifest {
    fn from(layer: &Layer) -> Self {
        Self {
            id: (!layer.id.is_empty()).then(|| layer.id.clone()),
            name: layer.name.clone(),
            namespace: (!layer.namespace.is_empty()).then(|| layer.namespace.clone()),
            processor: Some(layer.processor_id.clone()),
            description: layer.description.clone(),
            features: layer
                .features
                .iter()
                .map(|f| match (&f.title, &f.description) {
                    (None, None) => FeatureEntry::Id(f.id.clone()),
                    _ => FeatureEntry::Detailed {
                        id: f.id.clone(),
                        title: f.title.clone(),
                        description: f.description.clone(),
                    },
                })
                .collect(),
            layers: layer
                .layers
                .iter()
                .map(|child| LayerManifest::from(child.as_ref()))
                .collect(),
        }
    }
}

/// Manifest encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// `.json` is JSON; anything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Loads [`Layer`] trees from manifest files.
#[derive(Debug, Clone)]
pub struct LayerManifestLoader {
    default_processor: String,
}

impl Default for LayerManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerManifestLoader {
    pub fn new() -> Self {
        Self {
            default_processor: DEFAULT_PROCESSOR.to_string(),
        }
    }

    /// Processor id for a root layer that names none.
    pub fn with_default_processor(mut self, processor: impl Into<String>) -> Self {
        self.default_processor = processor.into();
        self
    }

    /// Read and convert the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::InvalidManifest`] when the file cannot be
    /// read or does not parse.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> StrataResult<Layer> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| invalid(path, format!("cannot read: {e}")))?;
        self.parse(&raw, ManifestFormat::from_path(path), path)
    }

    /// Convert manifest text; `origin` is only used in error messages.
    pub fn parse(&self, raw: &str, format: ManifestFormat, origin: &Path) -> StrataResult<Layer> {
        let manifest: LayerManifest = match format {
            ManifestFormat::Toml => toml::from_str(raw).map_err(|e| invalid(origin, e.to_string()))?,
            ManifestFormat::Json => {
                serde_json::from_str(raw).map_err(|e| invalid(origin, e.to_string()))?
            }
        };

        let layer = self.convert(&manifest, None);
        debug!(
            layer = %layer.id,
            processor = %layer.processor_id,
            layers = layer.tree_size(),
            "loaded layer manifest"
        );
        Ok(layer)
    }

    fn convert(&self, manifest: &LayerManifest, parent: Option<&Layer>) -> Layer {
        let namespace = manifest
            .namespace
            .clone()
            .or_else(|| parent.map(|p| p.namespace.clone()))
            .unwrap_or_default();
        let processor = manifest
            .processor
            .clone()
            .or_else(|| parent.map(|p| p.processor_id.clone()))
            .unwrap_or_else(|| self.default_processor.clone());
        let id = manifest
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut layer = Layer::new(id, manifest.name.clone(), namespace, processor)
            .with_features(manifest.features.iter().map(Feature::from));
        layer.description = manifest.description.clone();

        let children: Vec<Arc<Layer>> = manifest
            .layers
            .iter()
            .map(|child| Arc::new(self.convert(child, Some(&layer))))
            .collect();
        layer.layers = children;
        layer
    }

    /// Render a layer tree back into manifest text.
    pub fn render(&self, layer: &Layer, format: ManifestFormat) -> StrataResult<String> {
        let manifest = LayerManifest::from(layer);
        let origin = PathBuf::from(&layer.name);
        match format {
            ManifestFormat::Toml => {
                toml::to_string_pretty(&manifest).map_err(|e| invalid(&origin, e.to_string()))
            }
            ManifestFormat::Json => serde_json::to_string_pretty(&manifest)
                .map_err(|e| invalid(&origin, e.to_string())),
        }
    }
}

fn invalid(path: &Path, reason: String) -> strata_core::error::StrataError {
    ApplicationError::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}
