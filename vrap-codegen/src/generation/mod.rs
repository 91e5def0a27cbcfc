//! Renderer registration and unit enumeration.
//!
//! - [`Renderer`] / [`FileProducer`] - the two shapes of unit sources
//! - [`GeneratorSet`] - every source registered for a build
//! - [`build_metadata`] - the provenance unit synthesized for every run

mod metadata;
mod renderer;
mod set;

pub use metadata::{METADATA_PATH, build_metadata};
pub use renderer::{FileProducer, RenderFailure, Renderer};
pub use set::GeneratorSet;
