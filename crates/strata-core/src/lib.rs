//! Strata Core - layered feature composition engine
//!
//! This crate holds the domain model, the processing engine and the
//! application services of Strata, a generator that turns a tree of layers
//! into files on disk by running pluggable feature processors.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │          (GenerationService)            │
//! └──────────────────┬──────────────────────┘
//!                    │ drives
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │                Engine                   │
//! │ (TemplateProcessor, Catalog, Context)   │
//! └──────────────────┬──────────────────────┘
//!                    │ writes through
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │             (Filesystem)                │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     strata-adapters (Infrastructure)    │
//! │ (LocalFilesystem, manifests, templates) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strata_core::prelude::*;
//!
//! let registry = Arc::new(TemplateRegistry::new().with_template(my_generator));
//! let service = GenerationService::new(registry, filesystem);
//!
//! let layer = Layer::new("root", "demo", "com.example", "my-template")
//!     .with_feature("cargo.manifest");
//! let report = service.generate(layer, "./out").await?;
//! ```

pub mod domain;

pub mod application;

pub mod engine;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        GenerationReport, GenerationService, LayerPlan, LayerReport, ports::Filesystem,
    };
    pub use crate::domain::{Feature, FeatureType, Layer, LayerType};
    pub use crate::engine::{
        FeatureProcessor, FeatureProvider, ProcessorType, TemplateContext, TemplateGenerator,
        TemplateProcessor, TemplateRegistry,
    };
    pub use crate::error::{StrataError, StrataResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
