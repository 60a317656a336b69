//! Generation Service - main application orchestrator.
//!
//! This service coordinates one generation run:
//! 1. Validate the layer tree
//! 2. Resolve the root template and build the root context
//! 3. Process the tree (children concurrently, then each parent)
//! 4. Summarise what every layer applied

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DomainValidator as validator, Layer},
    engine::{TemplateContext, TemplateRegistry},
    error::StrataResult,
};

/// What one layer applied during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerReport {
    pub layer_id: String,
    pub name: String,
    pub template: String,
    pub path: PathBuf,
    pub depth: usize,
    pub applied: Vec<String>,
}

/// Outcome of a successful run, layers listed depth-first.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,
    pub layers: Vec<LayerReport>,
}

impl GenerationReport {
    pub fn from_context(context: &TemplateContext) -> Self {
        let mut layers = Vec::new();
        collect_reports(context, &mut layers);
        Self {
            generated_at: Utc::now(),
            layers,
        }
    }

    pub fn layer(&self, id: &str) -> Option<&LayerReport> {
        self.layers.iter().find(|l| l.layer_id == id)
    }

    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.applied.len()).sum()
    }
}

fn collect_reports(context: &TemplateContext, out: &mut Vec<LayerReport>) {
    let layer = context.layer();
    out.push(LayerReport {
        layer_id: layer.id.clone(),
        name: layer.display_name().to_string(),
        template: context.processor().id().to_string(),
        path: context.path().to_path_buf(),
        depth: context.depth(),
        applied: context
            .applied_features()
            .iter()
            .map(|f| f.id.clone())
            .collect(),
    });
    for child in context.children() {
        collect_reports(child, out);
    }
}

/// The features one layer would apply, without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerPlan {
    pub layer_id: String,
    pub name: String,
    pub template: Option<String>,
    pub path: PathBuf,
    pub features: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Main generation service.
pub struct GenerationService {
    registry: Arc<TemplateRegistry>,
    filesystem: Arc<dyn Filesystem>,
}

impl GenerationService {
    pub fn new(registry: Arc<TemplateRegistry>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            registry,
            filesystem,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Generate a layer tree into `output_root`.
    ///
    /// A failure anywhere in the tree aborts the run. Files already written
    /// by layers that finished before the failure are left in place.
    #[instrument(
        skip_all,
        fields(
            layer = %layer.id,
            template = %layer.processor_id,
            output_root = %output_root.as_ref().display()
        )
    )]
    pub async fn generate(
        &self,
        layer: Layer,
        output_root: impl AsRef<Path>,
    ) -> StrataResult<GenerationReport> {
        validator::validate_layer(&layer)?;
        info!(layers = layer.tree_size(), "Generating layer tree");

        let mut context = self.registry.create_context(
            layer,
            Arc::clone(&self.filesystem),
            output_root.as_ref(),
        )?;
        let processor = Arc::clone(context.processor());
        processor.process(&mut context).await?;

        let report = GenerationReport::from_context(&context);
        info!(
            layers = report.layers.len(),
            features = report.feature_count(),
            "Generation completed"
        );
        Ok(report)
    }

    /// Describe what `generate` would apply, layer by layer.
    ///
    /// Layers whose template is not registered are listed with no features;
    /// `generate` would skip them (or fail, for the root).
    pub fn plan(&self, layer: &Layer, output_root: impl AsRef<Path>) -> StrataResult<Vec<LayerPlan>> {
        validator::validate_layer(layer)?;
        if !self.registry.contains(&layer.processor_id) {
            return Err(ApplicationError::TemplateNotFound {
                id: layer.processor_id.clone(),
            }
            .into());
        }

        let mut plans = Vec::new();
        self.plan_layer(layer, output_root.as_ref().to_path_buf(), &mut plans);
        Ok(plans)
    }

    fn plan_layer(&self, layer: &Layer, path: PathBuf, out: &mut Vec<LayerPlan>) {
        let template = self.registry.get(&layer.processor_id);
        out.push(LayerPlan {
            layer_id: layer.id.clone(),
            name: layer.display_name().to_string(),
            template: template.map(|t| t.id().to_string()),
            path: path.clone(),
            features: template
                .map(|t| {
                    t.resolve_features(&layer.features)
                        .into_iter()
                        .map(|f| f.id)
                        .collect()
                })
                .unwrap_or_default(),
            dependencies: template
                .map(|t| {
                    t.dependencies()
                        .iter()
                        .filter_map(|ty| t.feature_processor_of(*ty))
                        .map(|p| p.id().to_string())
                        .collect()
                })
                .unwrap_or_default(),
        });

        if template.is_some() {
            for child in &layer.layers {
                self.plan_layer(child, path.join(&child.name), out);
            }
        }
    }

    /// Reconciled presets of a registered template.
    pub fn presets(&self, template_id: &str) -> StrataResult<Vec<Layer>> {
        self.registry
            .get(template_id)
            .map(|t| t.presets())
            .ok_or_else(|| {
                ApplicationError::TemplateNotFound {
                    id: template_id.to_string(),
                }
                .into()
            })
    }
}
