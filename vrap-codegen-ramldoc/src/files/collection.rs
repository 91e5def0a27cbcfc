//! Resource collection pages.

use std::sync::Arc;

use eyre::{Result, eyre};
use vrap_codegen::{Renderer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::{ApiModel, ResourceCollection};

use crate::paths::{collection_path, from_sibling_dir, resource_path};

/// Renders `collections/<name>.md`, a table of the resources sharing a
/// collection URI and their methods.
pub struct CollectionRenderer {
    model: Arc<ApiModel>,
}

impl CollectionRenderer {
    pub fn new(model: Arc<ApiModel>) -> Self {
        Self { model }
    }
}

impl Renderer<ResourceCollection> for CollectionRenderer {
    fn render(&self, collection: &ResourceCollection) -> Result<TemplateFile> {
        let mut builder = CodeBuilder::yaml();
        builder
            .push_line(&format!("# {}", collection.uri))
            .push_blank()
            .push_line("| Resource | Methods |")
            .push_line("| --- | --- |");

        for uri in &collection.resources {
            let resource = self
                .model
                .resources
                .iter()
                .find(|r| &r.full_uri == uri)
                .ok_or_else(|| eyre!("collection '{}' lists unknown resource '{}'", collection.uri, uri))?;
            let methods = resource
                .methods
                .iter()
                .map(|m| format!("`{}`", m.method.as_str().to_uppercase()))
                .collect::<Vec<_>>()
                .join(", ");
            builder.push_line(&format!(
                "| [`{}`]({}) | {} |",
                uri,
                from_sibling_dir(&resource_path(uri)),
                if methods.is_empty() { "-" } else { methods.as_str() }
            ));
        }

        Ok(TemplateFile::new(
            collection_path(&collection.uri),
            builder.build(),
        ))
    }
}
