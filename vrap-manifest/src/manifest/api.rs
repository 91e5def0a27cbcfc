//! Loading and validating the API model file.

use std::collections::HashSet;

use vrap_model::Api;

use crate::{Result, SourceContext};

/// Parse an API model and check that it is self-consistent.
///
/// Type names must be unique and every type reference must name a declared
/// type. The first problem found is reported with a span into `content`.
pub fn parse_api(content: &str, filename: &str) -> Result<Api> {
    let ctx = SourceContext::new(content, filename);
    let api: Api = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;

    let mut seen = HashSet::new();
    for ty in &api.types {
        if !seen.insert(ty.name()) {
            return Err(ctx.duplicate_type_error(ty.name()));
        }
    }

    let dangling = api.dangling_references();
    if let Some(first) = dangling.first() {
        return Err(ctx.dangling_reference_error(
            &first.owner,
            &first.reference,
            dangling.len() - 1,
        ));
    }

    Ok(api)
}
