//! Indexed view over a template's providers and processors.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::engine::processor::{FeatureProcessor, FeatureProvider, ProcessorType, type_id_of};

/// One processor together with the provider it was registered through.
#[derive(Clone)]
pub struct CatalogEntry {
    pub provider: Arc<dyn FeatureProvider>,
    pub processor: Arc<dyn FeatureProcessor>,
}

/// The resolved, indexed set of processors for one template processor.
///
/// Built once from an ordered provider list. Registration order across all
/// providers is the canonical order features are applied in.
///
/// Processor ids and types are expected to be unique. When they are not, the
/// later registration silently replaces the earlier one in every index.
#[derive(Clone, Default)]
pub struct Catalog {
    providers: Vec<Arc<dyn FeatureProvider>>,
    entries: Vec<CatalogEntry>,
    processors_by_id: HashMap<String, Arc<dyn FeatureProcessor>>,
    processors_by_type: HashMap<TypeId, Arc<dyn FeatureProcessor>>,
    order_by_id: HashMap<String, usize>,
    providers_by_type: HashMap<TypeId, Arc<dyn FeatureProvider>>,
}

impl Catalog {
    pub fn build(providers: Vec<Arc<dyn FeatureProvider>>) -> Self {
        let mut catalog = Self {
            providers,
            ..Self::default()
        };

        for provider in &catalog.providers {
            for processor in provider.processors() {
                let index = catalog.entries.len();
                let type_id = type_id_of(processor);
                let id = processor.id().to_string();

                catalog
                    .processors_by_id
                    .insert(id.clone(), Arc::clone(processor));
                catalog.order_by_id.insert(id, index);
                catalog
                    .processors_by_type
                    .insert(type_id, Arc::clone(processor));
                catalog
                    .providers_by_type
                    .insert(type_id, Arc::clone(provider));
                catalog.entries.push(CatalogEntry {
                    provider: Arc::clone(provider),
                    processor: Arc::clone(processor),
                });
            }
        }

        catalog
    }

    /// Providers in registration order.
    pub fn providers(&self) -> &[Arc<dyn FeatureProvider>] {
        &self.providers
    }

    /// Every registered processor in registration order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn processor(&self, id: &str) -> Option<&Arc<dyn FeatureProcessor>> {
        self.processors_by_id.get(id)
    }

    pub fn processor_of(&self, ty: ProcessorType) -> Option<&Arc<dyn FeatureProcessor>> {
        self.processors_by_type.get(&ty.type_id())
    }

    pub fn provider_of(&self, ty: ProcessorType) -> Option<&Arc<dyn FeatureProvider>> {
        self.providers_by_type.get(&ty.type_id())
    }

    /// Owning provider of a registered processor instance.
    pub fn provider_for(
        &self,
        processor: &Arc<dyn FeatureProcessor>,
    ) -> Option<&Arc<dyn FeatureProvider>> {
        self.providers_by_type.get(&type_id_of(processor))
    }

    /// Registration index of a processor id, `None` when unknown.
    ///
    /// `None` orders before every `Some`, so sorting by this key places
    /// unknown feature ids ahead of all known ones.
    pub fn order(&self, id: &str) -> Option<usize> {
        self.order_by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.id()).collect::<Vec<_>>(),
            )
            .field(
                "processors",
                &self
                    .entries
                    .iter()
                    .map(|e| e.processor.id())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl FeatureProcessor for Named {
        fn id(&self) -> &str {
            self.0
        }
    }

    struct Marker;

    impl FeatureProcessor for Marker {
        fn id(&self) -> &str {
            "marker"
        }
    }

    struct Group {
        id: &'static str,
        processors: Vec<Arc<dyn FeatureProcessor>>,
    }

    impl FeatureProvider for Group {
        fn id(&self) -> &str {
            self.id
        }

        fn processors(&self) -> &[Arc<dyn FeatureProcessor>] {
            &self.processors
        }
    }

    fn group(
        id: &'static str,
        processors: Vec<Arc<dyn FeatureProcessor>>,
    ) -> Arc<dyn FeatureProvider> {
        Arc::new(Group { id, processors })
    }

    #[test]
    fn registration_order_spans_providers() {
        let catalog = Catalog::build(vec![
            group("one", vec![Arc::new(Named("a")), Arc::new(Named("b"))]),
            group("empty", vec![]),
            group("two", vec![Arc::new(Named("c"))]),
        ]);

        assert_eq!(catalog.order("a"), Some(0));
        assert_eq!(catalog.order("b"), Some(1));
        assert_eq!(catalog.order("c"), Some(2));
        assert_eq!(catalog.order("missing"), None);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn duplicate_ids_keep_last_registration() {
        let catalog = Catalog::build(vec![
            group("one", vec![Arc::new(Named("dup"))]),
            group("two", vec![Arc::new(Named("x")), Arc::new(Named("dup"))]),
        ]);

        assert_eq!(catalog.order("dup"), Some(2));
        assert_eq!(catalog.entries().len(), 3);
    }

    #[test]
    fn type_index_resolves_processor_and_provider() {
        let catalog = Catalog::build(vec![
            group("plain", vec![Arc::new(Named("a"))]),
            group("marked", vec![Arc::new(Marker)]),
        ]);

        let ty = ProcessorType::of::<Marker>();
        assert_eq!(catalog.processor_of(ty).map(|p| p.id()), Some("marker"));
        assert_eq!(catalog.provider_of(ty).map(|p| p.id()), Some("marked"));

        let entry = &catalog.entries()[1];
        assert_eq!(
            catalog.provider_for(&entry.processor).map(|p| p.id()),
            Some("marked")
        );
    }

    #[test]
    fn building_twice_is_deterministic() {
        let providers = vec![
            group("one", vec![Arc::new(Named("a")), Arc::new(Named("b"))]),
            group("two", vec![Arc::new(Marker)]),
        ];
        let first = Catalog::build(providers.clone());
        let second = Catalog::build(providers);

        let ids = |c: &Catalog| {
            c.entries()
                .iter()
                .map(|e| e.processor.id().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
