//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`
//! and ships the built-in template generators. It contains all disk I/O and
//! manifest parsing.

pub mod filesystem;
pub mod generators;
pub mod manifest_loader;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use generators::{AppGenerator, RustWorkspaceGenerator, builtin_registry};
pub use manifest_loader::{LayerManifest, LayerManifestLoader, ManifestFormat};
