//! Generation pipeline for the vrap SDK generator.
//!
//! This crate turns a [`GeneratorSet`] and a resolved API model into files
//! written to a [`DataSink`](vrap_core::DataSink), and provides the
//! language-agnostic helpers used by the target crates
//! (e.g., `vrap-codegen-python`).
//!
//! # Module Organization
//!
//! - [`generation`] - Renderer and producer traits, the generator set, build metadata
//! - [`coordinator`] - [`CoreCodeGenerator`] and its options
//! - [`report`] - The outcome of a generation run
//! - [`builder`] - Indented text building ([`CodeBuilder`](builder::CodeBuilder))
//! - [`language`] - Naming conventions and type mapping
//! - [`naming`] - Names derived from resource URIs
//! - [`testing`] - Instrumented sinks and producers (feature-gated)

pub mod builder;
pub mod coordinator;
pub mod generation;
pub mod language;
pub mod naming;
pub mod report;
mod write_stage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use coordinator::{CoreCodeGenerator, GenerationOptions, RenderFailurePolicy};
pub use generation::{FileProducer, GeneratorSet, RenderFailure, Renderer};
pub use report::{FailureStage, GenerationReport, UnitFailure};
