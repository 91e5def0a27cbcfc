//! Resolved entity lists.
//!
//! Renderers never walk the nested [`Api`] themselves. They iterate the flat
//! lists computed here, one entity kind per list.

use std::collections::HashMap;

use crate::{
    AnyType, Api, Method, ObjectType, Resource, StringType, StringTypeKind, UnionType,
    UriTemplate,
};

/// The resolved API: every entity kind a renderer can be registered for.
#[derive(Debug, Clone, Default)]
pub struct ApiModel {
    pub title: String,
    pub base_uri: Option<String>,
    /// All declared types, in declaration order.
    pub types: Vec<AnyType>,
    pub object_types: Vec<ObjectType>,
    pub union_types: Vec<UnionType>,
    pub enum_string_types: Vec<StringType>,
    pub pattern_string_types: Vec<StringType>,
    pub named_scalar_types: Vec<StringType>,
    /// Top level resources.
    pub root_resources: Vec<SubResource>,
    /// Every resource, flattened depth-first.
    pub resources: Vec<ResourceInfo>,
    /// Every method with its owning resource.
    pub methods: Vec<ResourceMethod>,
    pub resource_collections: Vec<ResourceCollection>,
    type_index: HashMap<String, usize>,
}

/// A flattened resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInfo {
    pub relative_uri: UriTemplate,
    pub full_uri: UriTemplate,
    pub description: Option<String>,
    pub methods: Vec<Method>,
    /// Direct children of this resource.
    pub sub_resources: Vec<SubResource>,
}

/// A reference to a child resource.
#[derive(Debug, Clone, PartialEq)]
pub struct SubResource {
    pub relative_uri: UriTemplate,
    pub full_uri: UriTemplate,
    pub description: Option<String>,
}

/// A method together with the full URI of its resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMethod {
    pub full_uri: UriTemplate,
    pub method: Method,
}

/// Resources sharing a collection URI (see [`UriTemplate::collection`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCollection {
    pub uri: UriTemplate,
    pub resources: Vec<UriTemplate>,
}

impl ApiModel {
    /// Resolve a serialized API into entity lists.
    pub fn resolve(api: &Api) -> Self {
        let mut model = ApiModel {
            title: api.title.clone(),
            base_uri: api.base_uri.clone(),
            types: api.types.clone(),
            ..Default::default()
        };

        for (index, ty) in api.types.iter().enumerate() {
            model.type_index.insert(ty.name().to_string(), index);
            match ty {
                AnyType::Object(object) => model.object_types.push(object.clone()),
                AnyType::Union(union) => model.union_types.push(union.clone()),
                AnyType::String(string) => match string.kind() {
                    StringTypeKind::Enum => model.enum_string_types.push(string.clone()),
                    StringTypeKind::Pattern => model.pattern_string_types.push(string.clone()),
                    StringTypeKind::NamedScalar => model.named_scalar_types.push(string.clone()),
                },
            }
        }

        let root = UriTemplate::new("");
        model.root_resources = sub_resources(&root, &api.resources);
        for resource in &api.resources {
            model.flatten(&root, resource);
        }
        model.group_collections();
        model
    }

    /// Look up a declared type by name.
    pub fn type_by_name(&self, name: &str) -> Option<&AnyType> {
        self.type_index.get(name).map(|&i| &self.types[i])
    }

    fn flatten(&mut self, parent: &UriTemplate, resource: &Resource) {
        let relative_uri = UriTemplate::new(resource.relative_uri.as_str());
        let full_uri = parent.join(&relative_uri);

        for method in &resource.methods {
            self.methods.push(ResourceMethod {
                full_uri: full_uri.clone(),
                method: method.clone(),
            });
        }
        self.resources.push(ResourceInfo {
            relative_uri,
            full_uri: full_uri.clone(),
            description: resource.description.clone(),
            methods: resource.methods.clone(),
            sub_resources: sub_resources(&full_uri, &resource.resources),
        });

        for child in &resource.resources {
            self.flatten(&full_uri, child);
        }
    }

    fn group_collections(&mut self) {
        let mut positions: HashMap<UriTemplate, usize> = HashMap::new();
        for resource in &self.resources {
            let uri = resource.full_uri.collection();
            match positions.get(&uri) {
                Some(&i) => self.resource_collections[i]
                    .resources
                    .push(resource.full_uri.clone()),
                None => {
                    positions.insert(uri.clone(), self.resource_collections.len());
                    self.resource_collections.push(ResourceCollection {
                        uri,
                        resources: vec![resource.full_uri.clone()],
                    });
                }
            }
        }
    }
}

fn sub_resources(parent: &UriTemplate, children: &[Resource]) -> Vec<SubResource> {
    children
        .iter()
        .map(|child| {
            let relative_uri = UriTemplate::new(child.relative_uri.as_str());
            SubResource {
                full_uri: parent.join(&relative_uri),
                relative_uri,
                description: child.description.clone(),
            }
        })
        .collect()
}
