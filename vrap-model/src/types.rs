//! Type declarations.

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// A declared type in the API description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyType {
    Object(ObjectType),
    Union(UnionType),
    String(StringType),
}

impl AnyType {
    /// Get the declared type name.
    pub fn name(&self) -> &str {
        match self {
            AnyType::Object(t) => &t.name,
            AnyType::Union(t) => &t.name,
            AnyType::String(t) => &t.name,
        }
    }

    /// Get the package the type is declared in, if any.
    pub fn package(&self) -> Option<&str> {
        match self {
            AnyType::Object(t) => t.package.as_deref(),
            AnyType::Union(t) => t.package.as_deref(),
            AnyType::String(t) => t.package.as_deref(),
        }
    }

    /// Get the type description, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            AnyType::Object(t) => t.description.as_deref(),
            AnyType::Union(t) => t.description.as_deref(),
            AnyType::String(t) => t.description.as_deref(),
        }
    }
}

/// An object type with named properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectType {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the object type this one extends.
    #[serde(default)]
    pub parent: Option<String>,
    /// Property used to discriminate subtypes.
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub discriminator_value: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ObjectType {
    /// Returns true if every property is a pattern property, making the type a map.
    pub fn is_map(&self) -> bool {
        !self.properties.is_empty() && self.properties.iter().all(Property::is_pattern)
    }
}

/// A property of an object type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_required() -> bool {
    true
}

impl Property {
    /// Returns true for pattern properties (names written as `/regex/`).
    pub fn is_pattern(&self) -> bool {
        self.name.len() >= 2 && self.name.starts_with('/') && self.name.ends_with('/')
    }
}

/// A union of named types.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnionType {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub variants: Vec<String>,
}

/// A named string type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StringType {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Classification of a [`StringType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringTypeKind {
    /// Restricted to a fixed set of values.
    Enum,
    /// Constrained by a regular expression.
    Pattern,
    /// A plain named alias of `string`.
    NamedScalar,
}

impl StringType {
    /// Classify this string type. Enum values take precedence over a pattern.
    pub fn kind(&self) -> StringTypeKind {
        if !self.enum_values.is_empty() {
            StringTypeKind::Enum
        } else if self.pattern.is_some() {
            StringTypeKind::Pattern
        } else {
            StringTypeKind::NamedScalar
        }
    }
}

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
    DateTime,
    DateOnly,
    TimeOnly,
    Any,
    File,
}

impl ScalarType {
    /// Get the scalar name as written in the API description.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
            ScalarType::Boolean => "boolean",
            ScalarType::DateTime => "datetime",
            ScalarType::DateOnly => "date-only",
            ScalarType::TimeOnly => "time-only",
            ScalarType::Any => "any",
            ScalarType::File => "file",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let scalar = match name {
            "string" => ScalarType::String,
            "integer" => ScalarType::Integer,
            "number" => ScalarType::Number,
            "boolean" => ScalarType::Boolean,
            "datetime" => ScalarType::DateTime,
            "date-only" => ScalarType::DateOnly,
            "time-only" => ScalarType::TimeOnly,
            "any" => ScalarType::Any,
            "file" => ScalarType::File,
            _ => return None,
        };
        Some(scalar)
    }
}

/// A reference to a type: a built-in scalar, a declared type or an array.
///
/// Written as a string: `string`, `Cart`, `Cart[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TypeRef {
    Scalar(ScalarType),
    Named(String),
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Get the declared type name this reference points at, looking through arrays.
    pub fn named(&self) -> Option<&str> {
        match self {
            TypeRef::Scalar(_) => None,
            TypeRef::Named(name) => Some(name),
            TypeRef::Array(inner) => inner.named(),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for TypeRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(TypeRef::Array(Box::new(inner.parse()?)));
        }
        if let Some(scalar) = ScalarType::from_name(s) {
            return Ok(TypeRef::Scalar(scalar));
        }
        let valid = s
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(TypeRef::Named(s.to_string()))
        } else {
            Err(format!("invalid type reference '{}'", s))
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(scalar) => write!(f, "{}", scalar.as_str()),
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}
