//! Output paths of the documentation files.
//!
//! Files include each other with relative `!include` paths, so every path
//! is computed here and nowhere else.

use vrap_codegen::naming::resource_file_stem;
use vrap_core::to_kebab_case;
use vrap_model::{HttpMethod, UriTemplate};

/// Path of a type declaration, e.g. `types/cart/Cart.raml`.
pub fn type_path(name: &str, package: Option<&str>) -> String {
    match package {
        Some(package) => format!("types/{}/{}.raml", to_kebab_case(package), name),
        None => format!("types/{}.raml", name),
    }
}

/// Path of a resource, e.g. `resources/by-project-key-carts.raml`.
pub fn resource_path(full_uri: &UriTemplate) -> String {
    format!("resources/{}", resource_file_name(full_uri))
}

/// File name of a resource within `resources/`.
pub fn resource_file_name(full_uri: &UriTemplate) -> String {
    format!("{}.raml", resource_file_stem(full_uri))
}

/// Path of a method, e.g. `methods/by-project-key-carts-post.raml`.
pub fn method_path(full_uri: &UriTemplate, method: HttpMethod) -> String {
    format!("methods/{}-{}.raml", resource_file_stem(full_uri), method.as_str())
}

/// Path of a resource collection page, e.g. `collections/by-project-key-carts.md`.
pub fn collection_path(uri: &UriTemplate) -> String {
    format!("collections/{}.md", resource_file_stem(uri))
}

/// Make a top level path relative to another top level file's directory.
pub fn from_sibling_dir(path: &str) -> String {
    format!("../{}", path)
}
