//! Core utilities and types for the vrap SDK generator.
//!
//! This crate provides the output-side primitives shared by every
//! generator crate: the rendered [`TemplateFile`] and the [`DataSink`]
//! destinations it is written to.

mod file;
mod sink;
mod utils;

// Rendered output
pub use file::TemplateFile;
// Destinations
pub use sink::{DataSink, FileDataSink};
// String utilities
pub use utils::{to_camel_case, to_kebab_case, to_pascal_case, to_snake_case};
