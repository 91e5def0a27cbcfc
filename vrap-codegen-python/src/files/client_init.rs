//! `client/__init__.py`: the `Client` entry point.

use std::sync::Arc;

use eyre::Result;
use vrap_codegen::{FileProducer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::ApiModel;

use super::{
    GENERATED_HEADER,
    request_builder::{import_builder, push_accessor},
};
use crate::{
    imports::ImportSet,
    layout::{PackageLayout, relative_import},
};

/// Renders the `Client` class with one accessor per top level resource.
pub struct ClientInitProducer {
    model: Arc<ApiModel>,
    layout: PackageLayout,
}

impl ClientInitProducer {
    pub fn new(model: Arc<ApiModel>, layout: PackageLayout) -> Self {
        Self { model, layout }
    }
}

impl FileProducer for ClientInitProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        let package = self.layout.client_package();
        let mut imports = ImportSet::new();
        imports.import_from(
            relative_import(package, &self.layout.base_client_module()),
            "BaseClient",
        );
        for resource in &self.model.root_resources {
            import_builder(&mut imports, &self.layout, package, &resource.full_uri);
        }

        let mut builder = CodeBuilder::python();
        builder.push_lines(GENERATED_HEADER).push_blank();
        imports.push_into(&mut builder);
        builder
            .push_blank()
            .push_blank()
            .push_line("class Client(BaseClient):")
            .push_indent()
            .push_line("def __init__(self, *args, **kwargs):")
            .push_indent();
        if let Some(base_uri) = &self.model.base_uri {
            builder.push_line(&format!("kwargs.setdefault(\"url\", \"{}\")", base_uri));
        }
        builder
            .push_line("super().__init__(*args, **kwargs)")
            .push_dedent();

        for resource in &self.model.root_resources {
            builder.push_blank();
            push_accessor(&mut builder, resource, &[], "self");
        }

        Ok(vec![TemplateFile::new(
            self.layout.package_init_path(package),
            builder.build(),
        )])
    }
}

#[cfg(test)]
mod tests {
    use vrap_model::Api;

    use super::*;

    #[test]
    fn test_client_init() {
        let api: Api = toml::from_str(
            r#"
            title = "Shop"
            base_uri = "https://api.example.com"

            [[resources]]
            relative_uri = "/{projectKey}"
            description = "A project."

            [[resources]]
            relative_uri = "/health"
            "#,
        )
        .unwrap();
        let producer =
            ClientInitProducer::new(Arc::new(ApiModel::resolve(&api)), PackageLayout::default());

        let files = producer.produce_files().unwrap();

        assert_eq!(files[0].relative_path(), "vrap/client/__init__.py");
        insta::assert_snapshot!(files[0].content(), @r#"
        # This file is automatically generated by the vrap code generator.
        # Do not change it manually.

        from ..base_client import BaseClient
        from .api_root.by_project_key_request_builder import ByProjectKeyRequestBuilder
        from .health.health_request_builder import HealthRequestBuilder


        class Client(BaseClient):
            def __init__(self, *args, **kwargs):
                kwargs.setdefault("url", "https://api.example.com")
                super().__init__(*args, **kwargs)

            def with_project_key(self, project_key: str) -> ByProjectKeyRequestBuilder:
                """A project."""
                return ByProjectKeyRequestBuilder(
                    project_key=project_key,
                    client=self,
                )

            def health(self) -> HealthRequestBuilder:
                return HealthRequestBuilder(
                    client=self,
                )
        "#);
    }
}
