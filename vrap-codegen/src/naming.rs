//! Names derived from resource URIs.
//!
//! Shared by every target so that a resource gets the same builder name,
//! accessor and file stem whatever the language.

use vrap_core::{to_camel_case, to_kebab_case, to_pascal_case};
use vrap_model::UriTemplate;

/// Name of the request builder for a resource.
///
/// Static segments are PascalCased, variables become `By<Name>`:
/// `/{projectKey}/carts/{ID}` -> `ByProjectKeyCartsByIDRequestBuilder`.
pub fn request_builder_name(full_uri: &UriTemplate) -> String {
    format!("{}RequestBuilder", resource_stem(full_uri))
}

/// PascalCase stem of a resource name, e.g. `ByProjectKeyCartsByID`.
///
/// The top level resource `/` is named `ApiRoot`.
pub fn resource_stem(full_uri: &UriTemplate) -> String {
    let stem: String = full_uri.segments().map(segment_name).collect();
    if stem.is_empty() {
        "ApiRoot".to_string()
    } else {
        stem
    }
}

/// Kebab-case file stem of a resource, e.g. `by-project-key-carts-by-id`.
pub fn resource_file_stem(full_uri: &UriTemplate) -> String {
    let stem = full_uri
        .segments()
        .map(|segment| to_kebab_case(&segment_name(segment)))
        .collect::<Vec<_>>()
        .join("-");
    if stem.is_empty() {
        "api-root".to_string()
    } else {
        stem
    }
}

/// Name of the accessor a parent exposes for a child resource.
///
/// Static segments are camelCased, variables become `with<Name>`:
/// `/carts` -> `carts`, `/{ID}` -> `withId`, `/key={key}` -> `withKey`.
pub fn resource_method_name(relative_uri: &UriTemplate) -> String {
    let variables = relative_uri.variables();
    if variables.is_empty() {
        return to_camel_case(relative_uri.as_str());
    }
    let suffix = variables
        .iter()
        .map(|variable| {
            let pascal = to_pascal_case(variable);
            // Acronyms like ID read as a word
            if pascal.chars().all(|c| c.is_uppercase()) {
                to_pascal_case(&pascal.to_lowercase())
            } else {
                pascal
            }
        })
        .collect::<Vec<_>>()
        .join("And");
    format!("with{}", suffix)
}

fn segment_name(segment: &str) -> String {
    let mut name = String::new();
    let mut rest = segment;
    while let Some(start) = rest.find('{') {
        name.push_str(&to_pascal_case(&rest[..start]));
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                name.push_str("By");
                name.push_str(&to_pascal_case(&after[..end]));
                rest = &after[end + 1..];
            }
            None => {
                rest = after;
                break;
            }
        }
    }
    name.push_str(&to_pascal_case(rest));
    name
}
