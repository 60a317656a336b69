//! Lookup from a layer's `processor_id` to its template processor.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::Layer,
    engine::{
        context::TemplateContext,
        template::{TemplateGenerator, TemplateProcessor},
    },
    error::StrataResult,
};

/// Every template processor available to one generation run.
///
/// Registering a second template under an existing id replaces the first.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Arc<TemplateProcessor>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, generator: impl TemplateGenerator + 'static) -> Self {
        self.register(generator);
        self
    }

    /// Build the generator's catalog and register it under its id.
    pub fn register(&mut self, generator: impl TemplateGenerator + 'static) -> Arc<TemplateProcessor> {
        let processor = Arc::new(TemplateProcessor::new(generator));
        self.templates
            .insert(processor.id().to_string(), Arc::clone(&processor));
        processor
    }

    pub fn get(&self, id: &str) -> Option<&Arc<TemplateProcessor>> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Registered templates ordered by id.
    pub fn templates(&self) -> impl Iterator<Item = &Arc<TemplateProcessor>> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Create the root context for a layer tree.
    ///
    /// The root layer is generated directly into `output_root`; each child
    /// goes into a subdirectory named after it.
    pub fn create_context(
        self: &Arc<Self>,
        layer: Layer,
        filesystem: Arc<dyn Filesystem>,
        output_root: impl Into<PathBuf>,
    ) -> StrataResult<TemplateContext> {
        let processor = self.get(&layer.processor_id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                id: layer.processor_id.clone(),
            }
        })?;

        Ok(TemplateContext::new(
            Arc::new(layer),
            processor,
            Arc::clone(self),
            filesystem,
            output_root.into(),
            None,
        ))
    }
}
