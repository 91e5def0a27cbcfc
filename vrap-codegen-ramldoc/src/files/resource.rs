//! Resource declarations.

use eyre::Result;
use vrap_codegen::{Renderer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::ResourceInfo;

use super::push_description;
use crate::paths::{from_sibling_dir, method_path, resource_file_name, resource_path};

/// Renders `resources/<name>.raml`.
///
/// Methods and child resources are pulled in with `!include`, so the
/// resource tree of the API mirrors the file tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceRenderer;

impl Renderer<ResourceInfo> for ResourceRenderer {
    fn render(&self, resource: &ResourceInfo) -> Result<TemplateFile> {
        let mut builder = CodeBuilder::yaml();
        builder.push_line(&format!("# {}", resource.full_uri));
        push_description(&mut builder, resource.description.as_deref());

        let variables = resource.relative_uri.variables();
        if !variables.is_empty() {
            builder.push_line("uriParameters:").push_indent();
            for variable in &variables {
                builder
                    .push_line(&format!("{}:", variable))
                    .push_indent()
                    .push_line("type: string")
                    .push_line("required: true")
                    .push_dedent();
            }
            builder.push_dedent();
        }

        for method in &resource.methods {
            builder.push_line(&format!(
                "{}: !include {}",
                method.method.as_str(),
                from_sibling_dir(&method_path(&resource.full_uri, method.method))
            ));
        }

        for child in &resource.sub_resources {
            builder.push_line(&format!(
                "{}: !include {}",
                child.relative_uri,
                resource_file_name(&child.full_uri)
            ));
        }

        Ok(TemplateFile::new(
            resource_path(&resource.full_uri),
            builder.build(),
        ))
    }
}
