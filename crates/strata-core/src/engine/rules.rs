//! File rules applied by feature processors.
//!
//! A processor resolves a path inside its layer and hands it, together with a
//! list of rules, to [`TemplateContext::apply_rules`]. Rules see the
//! filesystem only through the [`Filesystem`] port.
//!
//! [`TemplateContext::apply_rules`]: crate::engine::TemplateContext::apply_rules

use std::path::Path;

use crate::{application::ports::Filesystem, error::StrataResult};

/// A single mutation of the generated file tree.
pub trait Rule: Send + Sync {
    fn apply(&self, filesystem: &dyn Filesystem, path: &Path) -> StrataResult<()>;
}

/// Writes `text` to the target file, creating parent directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteText {
    text: String,
}

impl WriteText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Rule for WriteText {
    fn apply(&self, filesystem: &dyn Filesystem, path: &Path) -> StrataResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            filesystem.create_dir_all(parent)?;
        }
        filesystem.write_file(path, &self.text)
    }
}

/// Moves `source` to `target`, both relative to the rule's path.
///
/// Does nothing when the base directory or the source does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFile {
    source: String,
    target: String,
}

impl MoveFile {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Rule for MoveFile {
    fn apply(&self, filesystem: &dyn Filesystem, path: &Path) -> StrataResult<()> {
        if !filesystem.exists(path) {
            return Ok(());
        }

        let from = path.join(&self.source);
        let to = path.join(&self.target);
        if filesystem.exists(&from) {
            if let Some(parent) = to.parent() {
                filesystem.create_dir_all(parent)?;
            }
            filesystem.rename(&from, &to)?;
        }
        Ok(())
    }
}

/// Removes the target file if it exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveFile;

impl Rule for RemoveFile {
    fn apply(&self, filesystem: &dyn Filesystem, path: &Path) -> StrataResult<()> {
        if filesystem.exists(path) {
            filesystem.remove_file(path)?;
        }
        Ok(())
    }
}
