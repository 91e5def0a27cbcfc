//! Serialized API description.

use std::collections::HashSet;

use serde::Deserialize;

use crate::{AnyType, TypeRef};

/// The API description as loaded from disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Api {
    pub title: String,
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub types: Vec<AnyType>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A resource with its methods and nested resources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resource {
    /// URI relative to the parent resource, e.g. `/carts`.
    pub relative_uri: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// An HTTP method of a resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Method {
    pub method: HttpMethod,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub query_parameters: Vec<QueryParameter>,
    #[serde(default)]
    pub body: Option<TypeRef>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Method {
    /// Get the body type of the first successful response, if any.
    pub fn return_type(&self) -> Option<&TypeRef> {
        self.responses
            .iter()
            .filter(|r| r.is_success())
            .find_map(|r| r.body.as_ref())
    }
}

/// HTTP method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    /// Get the lowercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Head => "head",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
        }
    }
}

/// A query parameter of a method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub required: bool,
}

impl QueryParameter {
    /// Returns true for pattern parameters (names written as `/regex/`).
    pub fn is_pattern(&self) -> bool {
        self.name.len() >= 2 && self.name.starts_with('/') && self.name.ends_with('/')
    }
}

/// A declared response of a method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub body: Option<TypeRef>,
}

impl Response {
    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A type reference that names no declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Where the reference appears, e.g. `Cart.lineItems` or `GET /carts`.
    pub owner: String,
    /// The missing type name.
    pub reference: String,
}

impl Api {
    /// Find every reference to a type that is not declared in [`Api::types`].
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let declared: HashSet<&str> = self.types.iter().map(AnyType::name).collect();
        let mut dangling = Vec::new();
        let mut check = |owner: String, reference: &str| {
            if !declared.contains(reference) {
                dangling.push(DanglingReference {
                    owner,
                    reference: reference.to_string(),
                });
            }
        };

        for ty in &self.types {
            match ty {
                AnyType::Object(object) => {
                    if let Some(parent) = &object.parent {
                        check(object.name.clone(), parent);
                    }
                    for property in &object.properties {
                        if let Some(name) = property.type_ref.named() {
                            check(format!("{}.{}", object.name, property.name), name);
                        }
                    }
                }
                AnyType::Union(union) => {
                    for variant in &union.variants {
                        check(union.name.clone(), variant);
                    }
                }
                AnyType::String(_) => {}
            }
        }

        let mut stack: Vec<(String, &Resource)> = self
            .resources
            .iter()
            .map(|r| (r.relative_uri.clone(), r))
            .collect();
        while let Some((uri, resource)) = stack.pop() {
            for method in &resource.methods {
                let owner = format!("{} {}", method.method.as_str().to_uppercase(), uri);
                let referenced = method
                    .body
                    .iter()
                    .chain(method.query_parameters.iter().map(|p| &p.type_ref))
                    .chain(method.responses.iter().filter_map(|r| r.body.as_ref()));
                for type_ref in referenced {
                    if let Some(name) = type_ref.named() {
                        check(owner.clone(), name);
                    }
                }
            }
            for child in &resource.resources {
                stack.push((format!("{}{}", uri, child.relative_uri), child));
            }
        }

        dangling
    }
}
