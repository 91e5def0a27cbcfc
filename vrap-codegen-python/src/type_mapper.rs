//! Python type mapper implementation.

use vrap_codegen::language::TypeMapper;
use vrap_model::{ScalarType, TypeRef};

/// Python type mapper implementation.
///
/// Declared types are written either as quoted forward references, for
/// model modules that may refer to types declared further down or in
/// modules imported only while type checking, or as plain names where the
/// type is imported at runtime.
#[derive(Debug, Clone, Copy)]
pub struct PythonTypeMapper {
    forward_references: bool,
}

impl PythonTypeMapper {
    /// Mapper writing declared types as `"Cart"`.
    pub fn forward_references() -> Self {
        Self {
            forward_references: true,
        }
    }

    /// Mapper writing declared types as `Cart`.
    pub fn direct() -> Self {
        Self {
            forward_references: false,
        }
    }

    /// Map a type reference wrapped in `typing.Optional`.
    pub fn map_optional(&self, type_ref: &TypeRef) -> String {
        format!("typing.Optional[{}]", self.map_type(type_ref))
    }

    /// Returns true if the mapped type needs `import datetime`.
    pub fn uses_datetime(type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Scalar(scalar) => matches!(
                scalar,
                ScalarType::DateTime | ScalarType::DateOnly | ScalarType::TimeOnly
            ),
            TypeRef::Named(_) => false,
            TypeRef::Array(inner) => Self::uses_datetime(inner),
        }
    }
}

impl TypeMapper for PythonTypeMapper {
    fn language(&self) -> &'static str {
        "python"
    }

    fn map_scalar(&self, scalar: ScalarType) -> &'static str {
        match scalar {
            ScalarType::String => "str",
            ScalarType::Integer => "int",
            ScalarType::Number => "float",
            ScalarType::Boolean => "bool",
            ScalarType::DateTime => "datetime.datetime",
            ScalarType::DateOnly => "datetime.date",
            ScalarType::TimeOnly => "datetime.time",
            ScalarType::Any => "typing.Any",
            ScalarType::File => "typing.BinaryIO",
        }
    }

    fn map_named(&self, name: &str) -> String {
        if self.forward_references {
            format!("\"{}\"", name)
        } else {
            name.to_string()
        }
    }

    fn map_array(&self, element: String) -> String {
        format!("typing.List[{}]", element)
    }
}
