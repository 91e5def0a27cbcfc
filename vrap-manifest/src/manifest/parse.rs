//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use super::Manifest;
use crate::{Error, Result, SourceContext, error::find_key_span};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "vrap.toml")
    }
}

impl Manifest {
    /// Parse a vrap.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a vrap.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
    validate_manifest(&manifest, &ctx)?;
    Ok(manifest)
}

/// Validate the manifest after parsing.
fn validate_manifest(manifest: &Manifest, ctx: &SourceContext) -> Result<()> {
    let codegen = &manifest.codegen;
    if codegen.concurrency == 0 {
        return Err(ctx.invalid_concurrency_error(codegen.concurrency));
    }

    if let Some(build_id) = &codegen.build_id {
        let span = find_key_span(ctx.src(), "build_id");
        if build_id.trim().is_empty() {
            return Err(ctx.validation_error_at("build_id must not be empty", span));
        }
        if build_id.contains(['\n', '\r']) {
            return Err(ctx.validation_error_at("build_id must be a single line", span));
        }
    }

    if codegen.output.as_os_str().is_empty() {
        let span = find_key_span(ctx.src(), "output");
        return Err(ctx.validation_error_at("output must not be empty", span));
    }

    for (key, name) in manifest.packages.iter() {
        if !is_valid_package(name) {
            return Err(ctx.invalid_package_error(key, name));
        }
    }
    Ok(())
}

/// Check for a dotted identifier such as `commercetools.platform`.
fn is_valid_package(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
