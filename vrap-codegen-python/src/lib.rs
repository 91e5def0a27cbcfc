//! Python client and model generator for the vrap SDK generator.
//!
//! This crate registers the renderers and producers that turn a resolved
//! API model into a Python package built on
//! [requests](https://pypi.org/project/requests/).
//!
//! # Usage
//!
//! This crate is used internally by the `vrap` CLI tool. You typically don't need
//! to use it directly.
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use vrap_codegen::{CoreCodeGenerator, GenerationOptions};
//! use vrap_core::FileDataSink;
//!
//! let model = Arc::new(ApiModel::resolve(&api));
//! let generators = vrap_codegen_python::generator_set(&model, &Packages::default());
//! let sink = Arc::new(FileDataSink::new("gen"));
//!
//! let report = CoreCodeGenerator::new(sink, generators, model, GenerationOptions::default())
//!     .generate()
//!     .await;
//! ```
//!
//! # Generated Output
//!
//! Paths are relative to the base package directory (`vrap/` by default):
//!
//! - `__init__.py` - Re-exports `Client`
//! - `base_client.py` - The HTTP layer built on `requests.Session`
//! - `client/__init__.py` - `Client` with one accessor per top level resource
//! - `client/<collection>/*_request_builder.py` - One request builder per resource
//! - `models/<module>.py` - Declared types, one module per package
//! - `models/__init__.py`, `models/_abstract.py` - Model package plumbing

mod imports;
mod layout;
mod naming;
mod type_mapper;

pub mod files;

use std::sync::Arc;

use vrap_codegen::GeneratorSet;
use vrap_manifest::Packages;
use vrap_model::ApiModel;

use files::{
    AbstractBaseProducer, BaseClientProducer, ClientInitProducer, ModelsInitProducer,
    ModelsModuleProducer, RequestBuilderInitRenderer, RequestBuilderRenderer, RootInitProducer,
};
pub use layout::{PackageLayout, relative_import};
pub use naming::PY_NAMING;
pub use type_mapper::PythonTypeMapper;

/// Every renderer and producer of the Python target.
pub fn generator_set(model: &Arc<ApiModel>, packages: &Packages) -> GeneratorSet {
    let layout = PackageLayout::new(packages);
    GeneratorSet::new()
        .with_resource_renderer(RequestBuilderRenderer::new(Arc::clone(model), layout.clone()))
        .with_resource_renderer(RequestBuilderInitRenderer::new(layout.clone()))
        .with_file_producer(ModelsModuleProducer::new(Arc::clone(model), layout.clone()))
        .with_file_producer(ModelsInitProducer::new(Arc::clone(model), layout.clone()))
        .with_file_producer(AbstractBaseProducer::new(layout.clone()))
        .with_file_producer(BaseClientProducer::new(layout.clone()))
        .with_file_producer(ClientInitProducer::new(Arc::clone(model), layout.clone()))
        .with_file_producer(RootInitProducer::new(layout))
}
