//! Check operation - configuration and model validation.

use vrap_manifest::VrapToml;
use vrap_model::{Api, ApiModel};

use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Both files were validated while loading, so this only summarizes what
/// a generation run would see.
pub fn check(vrap_toml: &VrapToml, api: &Api) -> CheckReport {
    let model = ApiModel::resolve(api);
    CheckReport {
        config_path: vrap_toml.path().to_path_buf(),
        api_path: vrap_toml.api_path(),
        title: model.title.clone(),
        target: vrap_toml.manifest().codegen.target,
        counts: entity_counts(&model),
    }
}

/// Number of entities per renderer category, in generation order.
fn entity_counts(model: &ApiModel) -> Vec<(&'static str, usize)> {
    vec![
        ("object types", model.object_types.len()),
        ("union types", model.union_types.len()),
        ("enum types", model.enum_string_types.len()),
        ("pattern types", model.pattern_string_types.len()),
        ("named scalar types", model.named_scalar_types.len()),
        ("resource collections", model.resource_collections.len()),
        ("methods", model.methods.len()),
        ("resources", model.resources.len()),
    ]
}
