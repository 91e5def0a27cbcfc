//! RAML type mapper implementation.

use vrap_codegen::{builder::CodeBuilder, language::TypeMapper};
use vrap_model::{ScalarType, TypeRef};

/// RAML type mapper implementation.
///
/// Types are written back in RAML notation: scalars by their built-in
/// name, arrays with the `[]` suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct RamlTypeMapper;

impl RamlTypeMapper {
    /// Write the `type:` of a declaration at the current indentation.
    ///
    /// Arrays are expanded to `type: array` with their `items`.
    pub fn push_type(&self, builder: &mut CodeBuilder, type_ref: &TypeRef) {
        match type_ref {
            TypeRef::Array(inner) => {
                builder
                    .push_line("type: array")
                    .push_line(&format!("items: {}", self.map_type(inner)));
            }
            _ => {
                builder.push_line(&format!("type: {}", self.map_type(type_ref)));
            }
        }
    }
}

impl TypeMapper for RamlTypeMapper {
    fn language(&self) -> &'static str {
        "raml"
    }

    fn map_scalar(&self, scalar: ScalarType) -> &'static str {
        scalar.as_str()
    }

    fn map_array(&self, element: String) -> String {
        format!("{}[]", element)
    }
}
