//! The feature-composition engine.
//!
//! ```text
//!  TemplateRegistry ──processor_id──▶ TemplateProcessor ──owns──▶ Catalog
//!                                          │                      │
//!                                          │ process(ctx)         ├─ FeatureProvider*
//!                                          ▼                      └─ FeatureProcessor*
//!                                    TemplateContext ──apply_rules──▶ Rule ──▶ Filesystem
//! ```

pub mod catalog;
pub mod context;
pub mod metadata;
pub mod processor;
pub mod registry;
pub mod rules;
pub mod template;

pub use catalog::{Catalog, CatalogEntry};
pub use context::{ContextLink, TemplateContext};
pub use metadata::{GitProcessor, MetadataProvider, ReadmeProcessor};
pub use processor::{FeatureProcessor, FeatureProvider, ProcessorType, UnknownProcessor};
pub use registry::TemplateRegistry;
pub use rules::{MoveFile, RemoveFile, Rule, WriteText};
pub use template::{TemplateGenerator, TemplateProcessor};
