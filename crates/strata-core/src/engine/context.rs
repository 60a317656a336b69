//! Per-layer processing state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::{
    application::ports::Filesystem,
    domain::{Feature, Layer},
    engine::{registry::TemplateRegistry, rules::Rule, template::TemplateProcessor},
    error::StrataResult,
};

/// Read-only view of an ancestor context.
///
/// Contexts are owned by the task processing their layer, so children see
/// their ancestors through this immutable chain rather than through the
/// ancestors' mutable state.
#[derive(Debug)]
pub struct ContextLink {
    layer: Arc<Layer>,
    path: PathBuf,
    parent: Option<Arc<ContextLink>>,
}

impl ContextLink {
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parent(&self) -> Option<&ContextLink> {
        self.parent.as_deref()
    }
}

/// Mutable state for one layer during one generation run.
///
/// Created immediately before its layer is processed and kept by the caller
/// afterwards only to inspect what was applied. After processing,
/// [`children`](Self::children) holds the contexts of every child layer whose
/// task ran to completion, in declaration order.
pub struct TemplateContext {
    layer: Arc<Layer>,
    processor: Arc<TemplateProcessor>,
    registry: Arc<TemplateRegistry>,
    filesystem: Arc<dyn Filesystem>,
    path: PathBuf,
    parent: Option<Arc<ContextLink>>,
    applied: Vec<Feature>,
    children: Vec<TemplateContext>,
}

impl TemplateContext {
    pub(crate) fn new(
        layer: Arc<Layer>,
        processor: Arc<TemplateProcessor>,
        registry: Arc<TemplateRegistry>,
        filesystem: Arc<dyn Filesystem>,
        path: PathBuf,
        parent: Option<Arc<ContextLink>>,
    ) -> Self {
        Self {
            layer,
            processor,
            registry,
            filesystem,
            path,
            parent,
            applied: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub(crate) fn layer_arc(&self) -> Arc<Layer> {
        Arc::clone(&self.layer)
    }

    /// Template processor selected by the layer's `processor_id`.
    pub fn processor(&self) -> &Arc<TemplateProcessor> {
        &self.processor
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }

    /// Output directory of this layer.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent(&self) -> Option<&ContextLink> {
        self.parent.as_deref()
    }

    /// Layer of the outermost context of this run.
    pub fn root_layer(&self) -> &Layer {
        let mut current = match self.parent.as_deref() {
            Some(link) => link,
            None => return &self.layer,
        };
        while let Some(next) = current.parent.as_deref() {
            current = next;
        }
        &current.layer
    }

    /// Number of ancestors; zero for the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut link = self.parent.as_deref();
        while let Some(current) = link {
            depth += 1;
            link = current.parent.as_deref();
        }
        depth
    }

    /// Create the context for one of this layer's children.
    ///
    /// Returns `None` when no template processor is registered for the
    /// child's `processor_id`; that child is skipped.
    pub fn on_add_child(&self, child: &Arc<Layer>) -> Option<TemplateContext> {
        let Some(processor) = self.registry.get(&child.processor_id) else {
            warn!(
                layer = %child.id,
                processor = %child.processor_id,
                "no template registered for child layer, skipping"
            );
            return None;
        };

        let link = ContextLink {
            layer: Arc::clone(&self.layer),
            path: self.path.clone(),
            parent: self.parent.clone(),
        };

        Some(TemplateContext::new(
            Arc::clone(child),
            Arc::clone(processor),
            Arc::clone(&self.registry),
            Arc::clone(&self.filesystem),
            self.path.join(&child.name),
            Some(Arc::new(link)),
        ))
    }

    /// Append a feature to the applied log.
    ///
    /// A feature applied more than once (declared and also pulled in as a
    /// dependency) is logged only the first time; returns whether it was new.
    pub fn record_applied(&mut self, feature: Feature) -> bool {
        if self.has_applied(&feature.id) {
            return false;
        }
        self.applied.push(feature);
        true
    }

    pub fn applied_features(&self) -> &[Feature] {
        &self.applied
    }

    pub fn has_applied(&self, id: &str) -> bool {
        self.applied.iter().any(|f| f.id == id)
    }

    pub fn children(&self) -> &[TemplateContext] {
        &self.children
    }

    pub(crate) fn attach_children(&mut self, children: impl IntoIterator<Item = TemplateContext>) {
        self.children.extend(children);
    }

    /// Resolve a path relative to this layer's output directory.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// Apply rules, in order, to a path relative to this layer's directory.
    pub fn apply_rules(&self, relative: impl AsRef<Path>, rules: &[&dyn Rule]) -> StrataResult<()> {
        let target = self.resolve(relative);
        for rule in rules {
            rule.apply(self.filesystem.as_ref(), &target)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TemplateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateContext")
            .field("layer", &self.layer.id)
            .field("processor", &self.processor.id())
            .field("path", &self.path)
            .field("applied", &self.applied)
            .field("children", &self.children.len())
            .finish()
    }
}
