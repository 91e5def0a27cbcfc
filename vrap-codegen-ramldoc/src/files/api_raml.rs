//! The `api.raml` entry point.

use std::sync::Arc;

use eyre::Result;
use indexmap::IndexMap;
use vrap_codegen::{FileProducer, builder::CodeBuilder};
use vrap_core::{TemplateFile, to_kebab_case};
use vrap_model::{AnyType, ApiModel};

use crate::paths::{resource_path, type_path};

/// Path of the entry point.
pub const API_RAML_PATH: &str = "api.raml";

/// Produces `api.raml`, which includes every type and top level resource.
///
/// Types are grouped by package, in order of first appearance.
pub struct ApiRamlProducer {
    model: Arc<ApiModel>,
}

impl ApiRamlProducer {
    pub fn new(model: Arc<ApiModel>) -> Self {
        Self { model }
    }
}

impl FileProducer for ApiRamlProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        let model = &self.model;
        let mut builder = CodeBuilder::yaml();
        builder
            .push_line("#%RAML 1.0")
            .push_line(&format!("title: {}", model.title));
        if let Some(base_uri) = &model.base_uri {
            builder.push_line(&format!("baseUri: {}", base_uri));
        }

        if !model.types.is_empty() {
            let mut packages: IndexMap<Option<&str>, Vec<&AnyType>> = IndexMap::new();
            for ty in &model.types {
                packages.entry(ty.package()).or_default().push(ty);
            }

            builder.push_line("types:").push_indent();
            for (package, types) in packages {
                builder.push_line(&format!(
                    "# {}",
                    package.map(to_kebab_case).unwrap_or_else(|| "common".to_string())
                ));
                for ty in types {
                    builder.push_line(&format!(
                        "{}: !include {}",
                        ty.name(),
                        type_path(ty.name(), ty.package())
                    ));
                }
            }
            builder.push_dedent();
        }

        for resource in &model.root_resources {
            builder.push_line(&format!(
                "{}: !include {}",
                resource.relative_uri,
                resource_path(&resource.full_uri)
            ));
        }

        Ok(vec![TemplateFile::new(API_RAML_PATH, builder.build())])
    }
}

#[cfg(test)]
mod tests {
    use vrap_model::Api;

    use super::*;

    #[test]
    fn test_api_raml() {
        let api: Api = toml::from_str(
            r#"
            title = "Shop"
            base_uri = "https://api.example.com"

            [[types]]
            kind = "object"
            name = "Cart"
            package = "Cart"

            [[types]]
            kind = "string"
            name = "Locale"
            pattern = "^[a-z]{2}$"

            [[types]]
            kind = "string"
            name = "CartState"
            package = "Cart"
            enum = ["Active"]

            [[resources]]
            relative_uri = "/{projectKey}"
            "#,
        )
        .unwrap();
        let producer = ApiRamlProducer::new(Arc::new(ApiModel::resolve(&api)));

        let files = producer.produce_files().unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path(), "api.raml");
        insta::assert_snapshot!(files[0].content(), @r"
        #%RAML 1.0
        title: Shop
        baseUri: https://api.example.com
        types:
          # cart
          Cart: !include types/cart/Cart.raml
          CartState: !include types/cart/CartState.raml
          # common
          Locale: !include types/Locale.raml
        /{projectKey}: !include resources/by-project-key.raml
        ");
    }

    #[test]
    fn test_empty_api() {
        let producer = ApiRamlProducer::new(Arc::new(ApiModel::default()));

        let files = producer.produce_files().unwrap();

        assert_eq!(files[0].content(), "#%RAML 1.0\ntitle: \n");
    }
}
