//! Template processors: catalog reconciliation, ordering and the layer
//! processing pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, debug_span, instrument, trace, warn};

use crate::{
    application::ApplicationError,
    domain::{Feature, Layer, LayerType},
    engine::{
        catalog::Catalog,
        context::TemplateContext,
        metadata::{GitProcessor, MetadataProvider, ReadmeProcessor},
        processor::{FeatureProcessor, FeatureProvider, ProcessorType, UnknownProcessor},
    },
    error::StrataResult,
};

/// Generation logic for one kind of layer.
///
/// Implementations declare their providers and presets; the surrounding
/// [`TemplateProcessor`] owns the catalog built from them and runs the
/// processing pipeline.
pub trait TemplateGenerator: Send + Sync {
    fn id(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    /// Providers in registration order. The built-in metadata provider is
    /// appended after these.
    fn create_providers(&self) -> Vec<Arc<dyn FeatureProvider>>;

    /// Named starter layers. Mandatory features are backfilled onto each.
    fn create_presets(&self) -> Vec<Layer> {
        Vec::new()
    }

    /// Processor types applied to every layer after its own features,
    /// whether or not the layer declared them.
    fn dependencies(&self) -> Vec<ProcessorType> {
        vec![
            ProcessorType::of::<ReadmeProcessor>(),
            ProcessorType::of::<GitProcessor>(),
        ]
    }

    /// Runs before child layers are dispatched.
    fn process_before(&self, context: &mut TemplateContext) -> StrataResult<()> {
        debug!(layer = %context.layer().id, "process before");
        Ok(())
    }

    /// Runs after cleanup, last step of the layer.
    fn process_after(&self, context: &mut TemplateContext) -> StrataResult<()> {
        debug!(layer = %context.layer().id, "process after");
        Ok(())
    }

    fn version(&self) -> &str {
        crate::VERSION
    }
}

/// A template generator together with its catalog.
///
/// The catalog is built once, in [`TemplateProcessor::new`], and shared
/// read-only by every layer task afterwards.
pub struct TemplateProcessor {
    generator: Arc<dyn TemplateGenerator>,
    catalog: Catalog,
    dependencies: Vec<ProcessorType>,
}

impl TemplateProcessor {
    pub fn new(generator: impl TemplateGenerator + 'static) -> Self {
        Self::from_generator(Arc::new(generator))
    }

    pub fn from_generator(generator: Arc<dyn TemplateGenerator>) -> Self {
        let mut providers = generator.create_providers();
        providers.push(Arc::new(MetadataProvider::new()));

        Self {
            catalog: Catalog::build(providers),
            dependencies: generator.dependencies(),
            generator,
        }
    }

    pub fn id(&self) -> &str {
        self.generator.id()
    }

    pub fn layer_type(&self) -> LayerType {
        self.generator.layer_type()
    }

    pub fn generator(&self) -> &dyn TemplateGenerator {
        self.generator.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn dependencies(&self) -> &[ProcessorType] {
        &self.dependencies
    }

    pub fn feature_processor(&self, id: &str) -> Option<&Arc<dyn FeatureProcessor>> {
        self.catalog.processor(id)
    }

    pub fn feature_processor_of(&self, ty: ProcessorType) -> Option<&Arc<dyn FeatureProcessor>> {
        self.catalog.processor_of(ty)
    }

    pub fn feature_provider_of(&self, ty: ProcessorType) -> Option<&Arc<dyn FeatureProvider>> {
        self.catalog.provider_of(ty)
    }

    /// Registration index of a feature id; `None` (unknown) sorts first.
    pub fn feature_order(&self, id: &str) -> Option<usize> {
        self.catalog.order(id)
    }

    /// Every catalog feature, in registration order.
    pub fn all_features(&self) -> Vec<Feature> {
        self.catalog
            .entries()
            .iter()
            .map(|entry| Feature::new(entry.processor.id()))
            .collect()
    }

    /// Mandatory catalog features absent from `candidates`.
    ///
    /// Returns, in registration order, one item per processor whose owning
    /// provider is required and whose id `id_of` finds in no candidate.
    pub fn missing_features<T>(
        &self,
        candidates: &[T],
        id_of: impl Fn(&T) -> &str,
        construct: impl Fn(Feature) -> T,
    ) -> Vec<T> {
        let present: HashSet<&str> = candidates.iter().map(&id_of).collect();

        self.catalog
            .entries()
            .iter()
            .filter(|entry| entry.provider.is_required())
            .filter(|entry| !present.contains(entry.processor.id()))
            .map(|entry| construct(Feature::new(entry.processor.id())))
            .collect()
    }

    /// Declared features plus mandatory backfill, in application order.
    pub fn resolve_features(&self, declared: &[Feature]) -> Vec<Feature> {
        let missing = self.missing_features(declared, Feature::id, std::convert::identity);
        if !missing.is_empty() {
            debug!(
                template = %self.id(),
                missing = ?missing.iter().map(Feature::id).collect::<Vec<_>>(),
                "adding missing features"
            );
        }

        let mut features: Vec<Feature> = declared.iter().cloned().chain(missing).collect();
        features.sort_by_key(|feature| self.feature_order(&feature.id));
        features
    }

    /// Declared presets, each with mandatory features backfilled.
    ///
    /// A template declaring no presets gets a single synthetic one holding
    /// only the mandatory features.
    pub fn presets(&self) -> Vec<Layer> {
        let mut presets = self.generator.create_presets();
        for preset in &mut presets {
            let missing =
                self.missing_features(&preset.features, Feature::id, std::convert::identity);
            preset.features.extend(missing);
        }

        if presets.is_empty() {
            let features = self.missing_features(&[], Feature::id, std::convert::identity);
            presets.push(self.create_preset(features));
        }
        presets
    }

    fn create_preset(&self, features: Vec<Feature>) -> Layer {
        Layer::new(
            "",
            "",
            format!("com.example.{}", self.layer_type().id()),
            self.id(),
        )
        .with_features(features)
    }

    /// Process the context's layer and, first, its whole subtree.
    ///
    /// Steps: before hook, children (concurrently, all joined), own features
    /// in registration order, dependencies, cleanup of every catalog
    /// processor, after hook.
    pub fn process<'a>(
        &'a self,
        context: &'a mut TemplateContext,
    ) -> BoxFuture<'a, StrataResult<()>> {
        let span = debug_span!(
            "process",
            template = %self.id(),
            layer = %context.layer().id,
            depth = context.depth()
        );

        Box::pin(
            async move {
                self.generator.process_before(context)?;
                self.process_children(context).await?;
                self.apply_processors(context)?;
                self.apply_dependencies(context)?;
                self.remove_processors(context)?;
                self.generator.process_after(context)?;
                Ok(())
            }
            .instrument(span),
        )
    }

    async fn process_children(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let layer = context.layer_arc();
        let children: Vec<TemplateContext> = layer
            .layers
            .iter()
            .filter_map(|child| context.on_add_child(child))
            .collect();

        if children.is_empty() {
            return Ok(());
        }

        let mut tasks = JoinSet::new();
        for (index, mut child) in children.into_iter().enumerate() {
            tasks.spawn(async move {
                let processor = Arc::clone(child.processor());
                let result = processor.process(&mut child).await;
                (index, child, result)
            });
        }

        let mut finished = Vec::new();
        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, child, result)) => {
                    if let Err(err) = result {
                        if failure.is_none() {
                            warn!(
                                layer = %layer.id,
                                child = %child.layer().id,
                                error = %err,
                                "child layer failed, cancelling siblings"
                            );
                            tasks.abort_all();
                            failure = Some(err);
                        }
                    }
                    finished.push((index, child));
                }
                Err(err) if err.is_cancelled() => {
                    trace!(layer = %layer.id, "sibling task cancelled");
                }
                Err(err) => {
                    if failure.is_none() {
                        tasks.abort_all();
                        failure = Some(
                            ApplicationError::ChildTaskFailed {
                                layer: layer.id.clone(),
                                reason: err.to_string(),
                            }
                            .into(),
                        );
                    }
                }
            }
        }

        finished.sort_by_key(|(index, _)| *index);
        context.attach_children(finished.into_iter().map(|(_, child)| child));

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn apply_processors(&self, context: &mut TemplateContext) -> StrataResult<()> {
        let layer = context.layer_arc();
        for feature in self.resolve_features(&layer.features) {
            match self.catalog.processor(&feature.id) {
                Some(processor) => processor.apply(context)?,
                None => UnknownProcessor::new(feature.id).apply(context)?,
            }
        }
        Ok(())
    }

    fn apply_dependencies(&self, context: &mut TemplateContext) -> StrataResult<()> {
        for dependency in &self.dependencies {
            match self.catalog.processor_of(*dependency) {
                Some(processor) => processor.apply(context)?,
                None => trace!(dependency = ?dependency, "dependency not in catalog, skipping"),
            }
        }
        Ok(())
    }

    #[instrument(level = "trace", skip_all)]
    fn remove_processors(&self, context: &mut TemplateContext) -> StrataResult<()> {
        for provider in self.catalog.providers() {
            for processor in provider.processors() {
                processor.remove(context)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for TemplateProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateProcessor")
            .field("id", &self.id())
            .field("layer_type", &self.layer_type())
            .field("catalog", &self.catalog)
            .finish()
    }
}
