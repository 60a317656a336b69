//! In-memory filesystem adapter, used by tests to inspect generated trees.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StrataResult,
};

/// In-memory filesystem.
///
/// Cloning shares the underlying tree, so a test can hand one clone to the
/// engine and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file's content, if present (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.get(path.as_ref()).cloned()
    }

    /// All files, sorted by path.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.keys().cloned().collect()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.files.clear();
        inner.directories.clear();
    }
}

fn missing(path: &Path, reason: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !inner.directories.contains(parent)
        {
            return Err(missing(path, "Parent directory does not exist").into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StrataResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| missing(path, "File does not exist").into())
    }

    fn rename(&self, from: &Path, to: &Path) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let moved: Vec<PathBuf> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        if moved.is_empty() && !inner.directories.contains(from) {
            return Err(missing(from, "Source does not exist").into());
        }

        for old in moved {
            if let Some(content) = inner.files.remove(&old) {
                let new = match old.strip_prefix(from) {
                    Ok(rest) if !rest.as_os_str().is_empty() => to.join(rest),
                    _ => to.to_path_buf(),
                };
                inner.files.insert(new, content);
            }
        }

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in dirs {
            inner.directories.remove(&old);
            let new = match old.strip_prefix(from) {
                Ok(rest) if !rest.as_os_str().is_empty() => to.join(rest),
                _ => to.to_path_buf(),
            };
            inner.directories.insert(new);
        }

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| missing(path, "File does not exist").into())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        let file = Path::new("/out/src/lib.rs");

        assert!(fs.write_file(file, "").is_err());

        fs.create_dir_all(Path::new("/out/src")).unwrap();
        fs.write_file(file, "pub fn f() {}").unwrap();
        assert_eq!(fs.contents(file).as_deref(), Some("pub fn f() {}"));
        assert!(fs.exists(Path::new("/out")));
    }

    #[test]
    fn rename_moves_directory_contents() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/old/nested")).unwrap();
        fs.write_file(Path::new("/out/old/nested/a.txt"), "a").unwrap();

        fs.rename(Path::new("/out/old"), Path::new("/out/new"))
            .unwrap();

        assert_eq!(fs.list_files(), [PathBuf::from("/out/new/nested/a.txt")]);
        assert!(fs.exists(Path::new("/out/new/nested")));
        assert!(!fs.exists(Path::new("/out/old")));
    }

    #[test]
    fn remove_file_keeps_siblings() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/a")).unwrap();
        fs.write_file(Path::new("/out/a/c.txt"), "c").unwrap();
        fs.write_file(Path::new("/out/keep.txt"), "k").unwrap();

        fs.remove_file(Path::new("/out/a/c.txt")).unwrap();

        assert_eq!(fs.list_files(), [PathBuf::from("/out/keep.txt")]);
        assert!(fs.exists(Path::new("/out/a")));
    }

    #[test]
    fn remove_missing_file_is_an_error() {
        let fs = MemoryFilesystem::new();
        assert!(fs.remove_file(Path::new("/nope")).is_err());
        assert!(fs.read_file(Path::new("/nope")).is_err());
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        fs.create_dir_all(Path::new("/x")).unwrap();
        fs.write_file(Path::new("/x/y"), "z").unwrap();

        assert_eq!(other.contents("/x/y").as_deref(), Some("z"));
        other.clear();
        assert!(fs.list_files().is_empty());
    }
}
