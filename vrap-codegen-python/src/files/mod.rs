//! Python file generators.
//!
//! Per-build producers write the model package and the client entry
//! points. Per-resource renderers write one request builder module per
//! resource and the `__init__.py` of its package.

mod abstract_base;
mod base_client;
mod client_init;
mod models_init;
mod models_module;
mod request_builder;
mod request_builder_init;
mod root_init;

pub use abstract_base::AbstractBaseProducer;
pub use base_client::BaseClientProducer;
pub use client_init::ClientInitProducer;
pub use models_init::ModelsInitProducer;
pub use models_module::ModelsModuleProducer;
pub use request_builder::RequestBuilderRenderer;
pub use request_builder_init::RequestBuilderInitRenderer;
pub use root_init::RootInitProducer;

/// Header written at the top of every generated Python file.
pub const GENERATED_HEADER: &str = "# This file is automatically generated by the vrap code generator.\n# Do not change it manually.";
