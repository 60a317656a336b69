//! Feature processors and the providers that group them.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{
    domain::{Feature, FeatureType},
    engine::context::TemplateContext,
    error::StrataResult,
};

/// The executable logic behind one feature.
///
/// Processor instances are shared by every layer task running against the
/// same catalog, so they must not hold mutable state: everything a processor
/// needs to remember lives in the [`TemplateContext`] it is handed.
pub trait FeatureProcessor: Any + Send + Sync {
    /// Stable catalog key; also the id of the feature this processor backs.
    fn id(&self) -> &str;

    /// Generate this feature's artifacts, then record it as applied.
    fn apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        self.do_apply(context)?;
        context.record_applied(Feature::new(self.id()));
        Ok(())
    }

    /// Processor-specific generation logic.
    fn do_apply(&self, _context: &mut TemplateContext) -> StrataResult<()> {
        Ok(())
    }

    /// Remove artifacts this processor may have left behind on an earlier
    /// run. Called for every processor of the catalog after application,
    /// whether or not the feature was applied in this pass.
    fn remove(&self, _context: &mut TemplateContext) -> StrataResult<()> {
        Ok(())
    }
}

/// A named group of processors with a required/optional flag.
pub trait FeatureProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Required providers have all their features backfilled into every
    /// layer and preset.
    fn is_required(&self) -> bool {
        false
    }

    fn feature_type(&self) -> FeatureType {
        FeatureType::Unspecified
    }

    /// Processors in registration order.
    fn processors(&self) -> &[Arc<dyn FeatureProcessor>];
}

/// Concrete Rust type of a processor, used to declare template dependencies.
#[derive(Clone, Copy)]
pub struct ProcessorType {
    type_id: TypeId,
    name: &'static str,
}

impl ProcessorType {
    pub fn of<P: FeatureProcessor>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ProcessorType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ProcessorType {}

impl fmt::Debug for ProcessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// `TypeId` of the concrete processor behind a trait object.
pub(crate) fn type_id_of(processor: &Arc<dyn FeatureProcessor>) -> TypeId {
    Any::type_id(&**processor)
}

/// Stand-in dispatched for feature ids that no processor is registered for.
///
/// Only logs; it neither writes files nor records the feature as applied.
#[derive(Debug, Clone)]
pub struct UnknownProcessor {
    id: String,
}

impl UnknownProcessor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl FeatureProcessor for UnknownProcessor {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&self, context: &mut TemplateContext) -> StrataResult<()> {
        debug!(feature = %self.id, layer = %context.layer().id, "apply unknown processor");
        Ok(())
    }

    fn remove(&self, context: &mut TemplateContext) -> StrataResult<()> {
        debug!(feature = %self.id, layer = %context.layer().id, "remove unknown processor");
        Ok(())
    }
}
