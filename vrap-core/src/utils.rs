//! Shared utility functions for code generation.

/// Convert a string to PascalCase (e.g., "by_project-key" -> "ByProjectKey")
///
/// Any non-alphanumeric character acts as a word separator.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to camelCase (e.g., "project-key" -> "projectKey")
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to kebab-case (e.g., "ProjectKey" -> "project-key")
pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// Convert a string to snake_case (e.g., "productKey" -> "product_key")
///
/// An uppercase run ends before the last capital of a new word, so
/// "ByIDRequest" becomes "by_id_request".
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();
    let mut prev_lower = false;
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (prev_lower || (prev_upper && next_lower)) && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower = false;
        } else if c.is_alphanumeric() {
            result.push(c);
            prev_lower = true;
        } else {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }
    result.trim_end_matches('_').to_string()
}
