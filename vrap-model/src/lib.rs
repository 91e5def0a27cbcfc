//! API model types for the vrap SDK generator.
//!
//! This crate holds the API description consumed by the generators. The
//! description arrives already resolved (types declared, references named)
//! and is turned into the flat entity lists the renderers iterate.
//!
//! # Architecture
//!
//! ```text
//! api.toml → Api (serialized form) → ApiModel (resolved entity lists) → renderers
//! ```
//!
//! The types are:
//! - Language-agnostic (no Python/RAML-specific concerns)
//! - Immutable once resolved, so they can be shared across worker threads

mod api;
mod model;
mod types;
mod uri;

pub use api::{Api, DanglingReference, HttpMethod, Method, QueryParameter, Resource, Response};
pub use model::{ApiModel, ResourceCollection, ResourceInfo, ResourceMethod, SubResource};
pub use types::{
    AnyType, ObjectType, Property, ScalarType, StringType, StringTypeKind, TypeRef, UnionType,
};
pub use uri::UriTemplate;
