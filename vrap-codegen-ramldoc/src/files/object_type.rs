//! Object type declarations.

use std::sync::Arc;

use eyre::{Result, bail};
use vrap_codegen::{Renderer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::{AnyType, ApiModel, ObjectType, Property};

use super::{DATA_TYPE_HEADER, push_description};
use crate::{paths::type_path, type_mapper::RamlTypeMapper};

/// Renders `types/<package>/<Name>.raml` for an object type.
///
/// Subtypes with a discriminator value list only their own properties,
/// preceded by the discriminator property restricted to that value. Other
/// types list every property, inherited ones included.
pub struct ObjectTypeRenderer {
    model: Arc<ApiModel>,
}

impl ObjectTypeRenderer {
    pub fn new(model: Arc<ApiModel>) -> Self {
        Self { model }
    }

    /// The type's ancestry, root first, ending with the type itself.
    fn chain<'a>(&'a self, object: &'a ObjectType) -> Result<Vec<&'a ObjectType>> {
        let mut chain = vec![object];
        let mut current = object;
        while let Some(parent) = &current.parent {
            let Some(AnyType::Object(parent)) = self.model.type_by_name(parent) else {
                bail!("parent '{}' of '{}' is not a declared object type", parent, current.name);
            };
            if chain.iter().any(|t| t.name == parent.name) {
                bail!("type '{}' inherits from itself", object.name);
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Ok(chain)
    }

    fn properties<'a>(&'a self, object: &'a ObjectType, chain: &[&'a ObjectType]) -> Vec<&'a Property> {
        let discriminator = chain
            .iter()
            .rev()
            .copied()
            .find_map(|t| t.discriminator.as_deref().map(|d| (d, t)));

        if object.discriminator_value.is_some() {
            let mut properties = Vec::new();
            if let Some((name, owner)) = discriminator
                && !object.properties.iter().any(|p| p.name == name)
                && let Some(property) = owner.properties.iter().find(|p| p.name == name)
            {
                properties.push(property);
            }
            properties.extend(&object.properties);
            return properties;
        }

        let mut properties: Vec<&Property> = Vec::new();
        for &ty in chain {
            for property in &ty.properties {
                match properties.iter().position(|p| p.name == property.name) {
                    Some(i) => properties[i] = property,
                    None => properties.push(property),
                }
            }
        }
        properties
    }

    fn subtypes(&self, object: &ObjectType) -> Vec<&str> {
        let mut subtypes: Vec<&str> = self
            .model
            .object_types
            .iter()
            .filter(|t| t.parent.as_deref() == Some(object.name.as_str()))
            .map(|t| t.name.as_str())
            .collect();
        subtypes.sort_unstable();
        subtypes
    }
}

impl Renderer<ObjectType> for ObjectTypeRenderer {
    fn render(&self, object: &ObjectType) -> Result<TemplateFile> {
        let mapper = RamlTypeMapper;
        let chain = self.chain(object)?;
        let discriminator = chain.iter().rev().find_map(|t| t.discriminator.as_deref());

        let mut builder = CodeBuilder::yaml();
        builder
            .push_line(DATA_TYPE_HEADER)
            .push_line(&format!("displayName: {}", object.name))
            .push_line(&format!(
                "type: {}",
                object.parent.as_deref().unwrap_or("object")
            ))
            .push_line("(builtinType): object");
        if let Some(discriminator) = &object.discriminator {
            builder.push_line(&format!("discriminator: {}", discriminator));
        }
        if let Some(value) = &object.discriminator_value {
            builder.push_line(&format!("discriminatorValue: {}", value));
        }
        let subtypes = self.subtypes(object);
        if !subtypes.is_empty() {
            builder.push_line("(oneOf):");
            for subtype in subtypes {
                builder.push_line(&format!("- {}", subtype));
            }
        }
        push_description(&mut builder, object.description.as_deref());

        builder.push_line("properties:").push_indent();
        for property in self.properties(object, &chain) {
            builder
                .push_line(&format!("{}:", property.name))
                .push_indent();
            mapper.push_type(&mut builder, &property.type_ref);
            if let (Some(value), Some(name)) = (&object.discriminator_value, discriminator)
                && name == property.name
            {
                builder.push_line("enum:").push_line(&format!("- {}", value));
            }
            builder
                .push_line(&format!("required: {}", property.required))
                .push_dedent();
        }
        builder.push_dedent();

        Ok(TemplateFile::new(
            type_path(&object.name, object.package.as_deref()),
            builder.build(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use vrap_model::Api;

    use super::*;

    const ACTIONS: &str = r#"
        title = "Shop"

        [[types]]
        kind = "object"
        name = "CartUpdateAction"
        package = "cart"
        discriminator = "action"

        [[types.properties]]
        name = "action"
        type = "string"

        [[types]]
        kind = "object"
        name = "CartSetKeyAction"
        package = "cart"
        parent = "CartUpdateAction"
        discriminator_value = "setKey"

        [[types.properties]]
        name = "key"
        type = "string"
        required = false

        [[types]]
        kind = "object"
        name = "CartAddLineItemAction"
        package = "cart"
        parent = "CartUpdateAction"
        discriminator_value = "addLineItem"
        description = "Adds a line item."

        [[types.properties]]
        name = "skus"
        type = "string[]"
    "#;

    fn render(name: &str) -> TemplateFile {
        let api: Api = toml::from_str(ACTIONS).expect("Failed to parse test api");
        let model = Arc::new(ApiModel::resolve(&api));
        let object = model
            .object_types
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .unwrap();
        ObjectTypeRenderer::new(model).render(&object).unwrap()
    }

    #[test]
    fn test_discriminated_base_type() {
        let file = render("CartUpdateAction");

        assert_eq!(file.relative_path(), "types/cart/CartUpdateAction.raml");
        insta::assert_snapshot!(file.content(), @r"
        #%RAML 1.0 DataType
        displayName: CartUpdateAction
        type: object
        (builtinType): object
        discriminator: action
        (oneOf):
        - CartAddLineItemAction
        - CartSetKeyAction
        properties:
          action:
            type: string
            required: true
        ");
    }

    #[test]
    fn test_subtype_restricts_discriminator() {
        let file = render("CartAddLineItemAction");

        insta::assert_snapshot!(file.content(), @r"
        #%RAML 1.0 DataType
        displayName: CartAddLineItemAction
        type: CartUpdateAction
        (builtinType): object
        discriminatorValue: addLineItem
        description: |-
          Adds a line item.
        properties:
          action:
            type: string
            enum:
            - addLineItem
            required: true
          skus:
            type: array
            items: string
            required: true
        ");
    }

    #[test]
    fn test_unknown_parent_fails() {
        let api: Api = toml::from_str(
            r#"
            title = "Shop"

            [[types]]
            kind = "object"
            name = "Cart"
            parent = "BaseResource"
            "#,
        )
        .unwrap();
        let model = Arc::new(ApiModel::resolve(&api));
        let object = model.object_types[0].clone();

        let error = ObjectTypeRenderer::new(model).render(&object).unwrap_err();
        assert_eq!(
            error.to_string(),
            "parent 'BaseResource' of 'Cart' is not a declared object type"
        );
    }
}
