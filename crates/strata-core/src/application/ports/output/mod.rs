//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::error::StrataResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (tests)
///
/// Handles are shared by every concurrently running layer task, so
/// implementations must be `Send + Sync`.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    /// Read a file as UTF-8 text.
    fn read_file(&self, path: &Path) -> StrataResult<String>;

    /// Move a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> StrataResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> StrataResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}
