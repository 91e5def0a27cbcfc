//! Method fragments.

use eyre::Result;
use vrap_codegen::{Renderer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::{ResourceMethod, ScalarType, TypeRef};

use super::push_description;
use crate::{paths::method_path, type_mapper::RamlTypeMapper};

/// Renders `methods/<resource>-<method>.raml`, included by the resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodRenderer;

impl Renderer<ResourceMethod> for MethodRenderer {
    fn render(&self, entity: &ResourceMethod) -> Result<TemplateFile> {
        let method = &entity.method;
        let mapper = RamlTypeMapper;

        let mut builder = CodeBuilder::yaml();
        builder.push_line(&format!(
            "# {} {}",
            method.method.as_str().to_uppercase(),
            entity.full_uri
        ));
        push_description(&mut builder, method.description.as_deref());

        if !method.query_parameters.is_empty() {
            builder.push_line("queryParameters:").push_indent();
            for parameter in &method.query_parameters {
                builder.push_line(&format!("{}:", parameter.name)).push_indent();
                mapper.push_type(&mut builder, &parameter.type_ref);
                builder
                    .push_line(&format!("required: {}", parameter.required))
                    .push_dedent();
            }
            builder.push_dedent();
        }

        if let Some(body) = &method.body {
            builder.push_line("body:").push_indent();
            push_media_type(&mut builder, &mapper, body);
            builder.push_dedent();
        }

        if !method.responses.is_empty() {
            builder.push_line("responses:").push_indent();
            for response in &method.responses {
                match &response.body {
                    Some(body) => {
                        builder
                            .push_line(&format!("{}:", response.status))
                            .push_indent()
                            .push_line("body:")
                            .push_indent();
                        push_media_type(&mut builder, &mapper, body);
                        builder.push_dedent().push_dedent();
                    }
                    None => {
                        builder.push_line(&format!("{}: {{}}", response.status));
                    }
                }
            }
            builder.push_dedent();
        }

        Ok(TemplateFile::new(
            method_path(&entity.full_uri, method.method),
            builder.build(),
        ))
    }
}

fn push_media_type(builder: &mut CodeBuilder, mapper: &RamlTypeMapper, type_ref: &TypeRef) {
    let media_type = match type_ref {
        TypeRef::Scalar(ScalarType::File) => "application/octet-stream",
        _ => "application/json",
    };
    builder.push_line(&format!("{}:", media_type)).push_indent();
    mapper.push_type(builder, type_ref);
    builder.push_dedent();
}
