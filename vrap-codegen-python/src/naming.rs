//! Python-specific naming conventions.

use vrap_codegen::language::NamingConvention;
use vrap_core::{to_pascal_case, to_snake_case};

fn escape_py_reserved(name: &str) -> String {
    format!("{}_", name)
}

/// Python naming conventions.
pub const PY_NAMING: NamingConvention = NamingConvention {
    // Classes use PascalCase
    to_type: to_pascal_case,
    // Modules use snake_case
    to_module: to_snake_case,
    // Attributes and arguments use snake_case
    to_field: to_snake_case,
    reserved_words: &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
        "return", "try", "while", "with", "yield",
    ],
    escape_reserved: escape_py_reserved,
};

/// Name of an enum member for a declared value, e.g. `"Active"` -> `ACTIVE`.
pub fn enum_member_name(value: &str) -> String {
    let name = to_snake_case(value).to_uppercase();
    match name.chars().next() {
        None => "EMPTY".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", name),
        Some(_) => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_py_naming_field() {
        assert_eq!(PY_NAMING.field_name("lineItems"), "line_items");
        assert_eq!(PY_NAMING.field_name("projectKey"), "project_key");
        assert_eq!(PY_NAMING.field_name("ID"), "id");
    }

    #[test]
    fn test_py_naming_module() {
        assert_eq!(PY_NAMING.module_name("ShoppingList"), "shopping_list");
        assert_eq!(PY_NAMING.module_name("cart-discount"), "cart_discount");
    }

    #[test]
    fn test_py_reserved_words() {
        assert!(PY_NAMING.is_reserved("from"));
        assert!(PY_NAMING.is_reserved("None"));
        assert!(!PY_NAMING.is_reserved("type"));
        assert_eq!(PY_NAMING.field_name("from"), "from_");
        assert_eq!(PY_NAMING.field_name("global"), "global_");
    }

    #[test]
    fn test_enum_member_name() {
        assert_eq!(enum_member_name("Active"), "ACTIVE");
        assert_eq!(enum_member_name("MergeWithExistingCustomerCart"), "MERGE_WITH_EXISTING_CUSTOMER_CART");
        assert_eq!(enum_member_name("in-store"), "IN_STORE");
        assert_eq!(enum_member_name("2xx"), "_2XX");
        assert_eq!(enum_member_name(""), "EMPTY");
    }
}
