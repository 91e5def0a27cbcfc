use std::path::{Component, Path, PathBuf};

use vrap_model::Api;

use super::{Manifest, parse_api};
use crate::{Error, Result, SourceContext, error::find_key_span};

/// Represents a vrap.toml file with both raw content and parsed manifest.
///
/// Relative paths in the manifest are resolved against the directory
/// containing the file.
#[derive(Debug)]
pub struct VrapToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl VrapToml {
    /// Open and parse a vrap.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read(&path)?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        let vrap_toml = Self {
            path,
            content,
            manifest,
        };
        vrap_toml.check_output_dir(&vrap_toml.output_dir())?;
        Ok(vrap_toml)
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Get the directory containing the file.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Get the resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.manifest.codegen.output)
    }

    /// Get the resolved API model path.
    pub fn api_path(&self) -> PathBuf {
        self.base_dir().join(&self.manifest.api.path)
    }

    /// Reject an output directory that is, or contains, the project directory
    /// or the API model.
    ///
    /// The output directory is removed before every generation run, so such a
    /// directory would delete the inputs along with the previous output.
    pub fn check_output_dir(&self, dir: &Path) -> Result<()> {
        let output = resolve(dir);
        let protected = if resolve(self.base_dir()).starts_with(&output) {
            Some(format!("the directory containing {}", self.path.display()))
        } else if resolve(&self.api_path()).starts_with(&output) {
            Some(format!("the api file {}", self.api_path().display()))
        } else {
            None
        };
        let Some(protected) = protected else {
            return Ok(());
        };

        let ctx = SourceContext::new(self.content.as_str(), self.path.display().to_string());
        // Only label the key when the directory came from the file itself
        let span = (dir == self.output_dir())
            .then(|| find_key_span(&self.content, "output"))
            .flatten();
        Err(ctx.unsafe_output_error(dir.to_path_buf(), protected, span))
    }

    /// Read, parse and validate the API model.
    pub fn load_api(&self) -> Result<Api> {
        let path = self.api_path();
        if !path.is_file() {
            let ctx = SourceContext::new(self.content.as_str(), self.path.display().to_string());
            let configured = self.manifest.api.path.display().to_string();
            return Err(ctx.api_not_found_error(&configured, path));
        }
        let content = read(&path)?;
        parse_api(&content, &path.display().to_string())
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })
}

/// Resolve a path for containment checks.
///
/// The path is made absolute and normalized lexically, then canonicalized
/// when it exists so symlinks are followed.
fn resolve(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved.canonicalize().unwrap_or(resolved)
}
