//! Language-agnostic type mapping.

use vrap_model::{ScalarType, TypeRef};

/// Trait for mapping model type references to language-specific type strings.
///
/// Implement this trait for each target language.
pub trait TypeMapper {
    /// The target language name
    fn language(&self) -> &'static str;

    /// Map a built-in scalar type
    fn map_scalar(&self, scalar: ScalarType) -> &'static str;

    /// Map a reference to a declared type
    fn map_named(&self, name: &str) -> String {
        name.to_string()
    }

    /// Wrap an already mapped element type in an array type
    fn map_array(&self, element: String) -> String;

    /// Map any type reference
    fn map_type(&self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Scalar(scalar) => self.map_scalar(*scalar).to_string(),
            TypeRef::Named(name) => self.map_named(name),
            TypeRef::Array(inner) => self.map_array(self.map_type(inner)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BracketMapper;

    impl TypeMapper for BracketMapper {
        fn language(&self) -> &'static str {
            "test"
        }

        fn map_scalar(&self, scalar: ScalarType) -> &'static str {
            match scalar {
                ScalarType::Integer => "int",
                _ => "str",
            }
        }

        fn map_array(&self, element: String) -> String {
            format!("[{}]", element)
        }
    }

    #[test]
    fn test_map_type_recurses_into_arrays() {
        let type_ref: TypeRef = "integer[][]".parse().unwrap();
        assert_eq!(BracketMapper.map_type(&type_ref), "[[int]]");

        let named: TypeRef = "Cart".parse().unwrap();
        assert_eq!(BracketMapper.map_type(&named), "Cart");
    }
}
