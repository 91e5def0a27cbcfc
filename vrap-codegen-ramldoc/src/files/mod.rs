//! RAML documentation file generators.

mod api_raml;
mod collection;
mod method;
mod object_type;
mod resource;
mod string_type;
mod union_type;

pub use api_raml::ApiRamlProducer;
pub use collection::CollectionRenderer;
pub use method::MethodRenderer;
pub use object_type::ObjectTypeRenderer;
pub use resource::ResourceRenderer;
pub use string_type::StringTypeRenderer;
pub use union_type::UnionTypeRenderer;

use vrap_codegen::builder::CodeBuilder;

/// First line of every type declaration.
pub const DATA_TYPE_HEADER: &str = "#%RAML 1.0 DataType";

/// Write a `description` block scalar, if there is a description.
pub(crate) fn push_description(builder: &mut CodeBuilder, description: Option<&str>) {
    if let Some(description) = description {
        builder
            .push_line("description: |-")
            .push_indent()
            .push_lines(description.trim())
            .push_dedent();
    }
}
