use std::path::{Component, Path, PathBuf};

use eyre::{Result, bail};
use serde::Serialize;

/// A fully rendered output file.
///
/// The path is relative to the destination root. Content is complete when
/// the value is created; nothing downstream renders it further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateFile {
    relative_path: String,
    content: String,
}

impl TemplateFile {
    /// Create a new file with the given relative path and content
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Get the path relative to the destination root
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Get the rendered content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Resolve the relative path against a base directory.
    ///
    /// Fails for empty paths and for paths that would escape `base`
    /// (absolute paths, `..` components).
    pub fn resolve(&self, base: &Path) -> Result<PathBuf> {
        if self.relative_path.is_empty() {
            bail!("template file has an empty path");
        }

        let relative = Path::new(&self.relative_path);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => bail!(
                    "template path '{}' escapes the output directory",
                    self.relative_path
                ),
            }
        }

        Ok(base.join(relative))
    }
}
