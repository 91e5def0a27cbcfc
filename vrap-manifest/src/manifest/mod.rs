//! Manifest types and parsing for vrap.toml files.

mod api;
mod codegen;
mod file;
mod parse;
mod target;

pub use api::parse_api;
pub use codegen::{
    ApiConfig, CodegenConfig, DEFAULT_BUILD_ID, DEFAULT_CONCURRENCY, Packages, RenderFailures,
};
pub use file::VrapToml;
use serde::Deserialize;
pub use target::Target;

/// Root manifest for vrap.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Generation settings
    pub codegen: CodegenConfig,

    /// Location of the API model
    pub api: ApiConfig,

    /// Package names for generated code
    #[serde(default)]
    pub packages: Packages,
}
