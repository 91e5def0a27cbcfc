// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Configuration for the vrap SDK generator.
//!
//! - [`Manifest`] - the parsed `vrap.toml` build configuration
//! - [`VrapToml`] - a `vrap.toml` on disk, resolving paths and loading the API model
//! - [`Error`] - rich diagnostics pointing into the offending file

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    ApiConfig, CodegenConfig, DEFAULT_BUILD_ID, DEFAULT_CONCURRENCY, Manifest, Packages,
    RenderFailures, Target, VrapToml, parse_api,
};
