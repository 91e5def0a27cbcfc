//! Union type declarations.

use eyre::{Result, bail};
use vrap_codegen::{Renderer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::UnionType;

use super::{DATA_TYPE_HEADER, push_description};
use crate::paths::type_path;

/// Renders `types/<package>/<Name>.raml` for a union type.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionTypeRenderer;

impl Renderer<UnionType> for UnionTypeRenderer {
    fn render(&self, union: &UnionType) -> Result<TemplateFile> {
        if union.variants.is_empty() {
            bail!("union '{}' has no variants", union.name);
        }

        let mut builder = CodeBuilder::yaml();
        builder
            .push_line(DATA_TYPE_HEADER)
            .push_line(&format!("displayName: {}", union.name))
            .push_line(&format!("type: {}", union.variants.join(" | ")))
            .push_line("(builtinType): union");
        push_description(&mut builder, union.description.as_deref());

        Ok(TemplateFile::new(
            type_path(&union.name, union.package.as_deref()),
            builder.build(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn union(variants: &[&str]) -> UnionType {
        UnionType {
            name: "ProductReference".to_string(),
            package: Some("Product".to_string()),
            description: None,
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_union_type() {
        let file = UnionTypeRenderer
            .render(&union(&["ProductKeyReference", "ProductIdReference"]))
            .unwrap();

        assert_eq!(file.relative_path(), "types/product/ProductReference.raml");
        insta::assert_snapshot!(file.content(), @r"
        #%RAML 1.0 DataType
        displayName: ProductReference
        type: ProductKeyReference | ProductIdReference
        (builtinType): union
        ");
    }

    #[test]
    fn test_empty_union_fails() {
        let error = UnionTypeRenderer.render(&union(&[])).unwrap_err();
        assert_eq!(error.to_string(), "union 'ProductReference' has no variants");
    }
}
