//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The engine itself lives in `crate::engine`; services only wire it to
//! ports and summarise its results.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{GenerationReport, GenerationService, LayerPlan, LayerReport};

pub use ports::Filesystem;

pub use error::ApplicationError;
