//! Naming conventions for different target languages.

/// Language-specific naming conventions.
///
/// Defines how to transform type names, module names and field names, and
/// how to handle reserved words.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Transform a declared name to a type name (e.g., "cart-draft" -> "CartDraft")
    pub to_type: fn(&str) -> String,
    /// Transform a declared name to a module or file name (e.g., "CartDraft" -> "cart_draft")
    pub to_module: fn(&str) -> String,
    /// Transform a property name to a field name
    pub to_field: fn(&str) -> String,
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
    /// Escape a reserved word (e.g., "from" -> "from_" in Python)
    pub escape_reserved: fn(&str) -> String,
}

impl NamingConvention {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    /// Transform and make safe for use as a type name.
    pub fn type_name(&self, name: &str) -> String {
        let transformed = (self.to_type)(name);
        self.safe_name(&transformed)
    }

    /// Transform and make safe for use as a module name.
    pub fn module_name(&self, name: &str) -> String {
        let transformed = (self.to_module)(name);
        self.safe_name(&transformed)
    }

    /// Transform and make safe for use as a field name.
    pub fn field_name(&self, name: &str) -> String {
        let transformed = (self.to_field)(name);
        self.safe_name(&transformed)
    }
}
