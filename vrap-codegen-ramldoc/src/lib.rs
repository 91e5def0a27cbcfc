//! RAML documentation generator for the vrap SDK generator.
//!
//! Writes the resolved API back out as a tree of RAML fragments tied
//! together by `!include`, plus a Markdown page per resource collection.
//!
//! # Generated Output
//!
//! - `api.raml` - Entry point including every type and top level resource
//! - `types/<package>/<Name>.raml` - One declaration per type
//! - `resources/<name>.raml` - One file per resource
//! - `methods/<resource>-<method>.raml` - One fragment per method
//! - `collections/<name>.md` - Resources sharing a collection URI

mod paths;
mod type_mapper;

pub mod files;

use std::sync::Arc;

use vrap_codegen::GeneratorSet;
use vrap_model::ApiModel;

use files::{
    ApiRamlProducer, CollectionRenderer, MethodRenderer, ObjectTypeRenderer, ResourceRenderer,
    StringTypeRenderer, UnionTypeRenderer,
};
pub use type_mapper::RamlTypeMapper;

/// Every renderer and producer of the RAML documentation target.
pub fn generator_set(model: &Arc<ApiModel>) -> GeneratorSet {
    GeneratorSet::new()
        .with_object_type_renderer(ObjectTypeRenderer::new(Arc::clone(model)))
        .with_union_type_renderer(UnionTypeRenderer)
        .with_enum_string_type_renderer(StringTypeRenderer)
        .with_pattern_string_type_renderer(StringTypeRenderer)
        .with_named_scalar_type_renderer(StringTypeRenderer)
        .with_resource_collection_renderer(CollectionRenderer::new(Arc::clone(model)))
        .with_method_renderer(MethodRenderer)
        .with_resource_renderer(ResourceRenderer)
        .with_file_producer(ApiRamlProducer::new(Arc::clone(model)))
}
