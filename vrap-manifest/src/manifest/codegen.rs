//! The `[codegen]`, `[api]` and `[packages]` sections.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Target;

/// Build id written to `gen.properties` when none is configured.
pub const DEFAULT_BUILD_ID: &str = "unknown";

/// Default cap on concurrent writes.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CodegenConfig {
    /// What to generate
    pub target: Target,

    /// Output directory, relative to vrap.toml
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Identifier of the generator build, recorded in `gen.properties`
    #[serde(default)]
    pub build_id: Option<String>,

    /// Maximum number of files written concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// What happens when a renderer fails
    #[serde(default)]
    pub render_failures: RenderFailures,

    /// Warn when two units resolve to the same path
    #[serde(default)]
    pub detect_collisions: bool,
}

impl CodegenConfig {
    /// Get the configured build id, or [`DEFAULT_BUILD_ID`].
    pub fn build_id(&self) -> &str {
        self.build_id.as_deref().unwrap_or(DEFAULT_BUILD_ID)
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("gen")
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

/// Handling of renderer failures during enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailures {
    /// Record the failure and keep generating
    #[default]
    Isolate,
    /// Stop enumerating further units
    Abort,
}

/// Location of the API model.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Path to the API model, relative to vrap.toml
    pub path: PathBuf,
}

/// Package names used by generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Packages {
    #[serde(default = "default_base_package")]
    pub base: String,
    #[serde(default = "default_client_package")]
    pub client: String,
    #[serde(default = "default_model_package")]
    pub model: String,
}

impl Default for Packages {
    fn default() -> Self {
        Self {
            base: default_base_package(),
            client: default_client_package(),
            model: default_model_package(),
        }
    }
}

impl Packages {
    /// Iterate `(key, name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("base", self.base.as_str()),
            ("client", self.client.as_str()),
            ("model", self.model.as_str()),
        ]
        .into_iter()
    }
}

fn default_base_package() -> String {
    "vrap".to_string()
}

fn default_client_package() -> String {
    "client".to_string()
}

fn default_model_package() -> String {
    "models".to_string()
}
