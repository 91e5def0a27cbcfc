//! Indentation units.

/// The text written once per indentation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(&'static str);

impl Indent {
    /// Four spaces, as PEP 8 asks for.
    pub const PYTHON: Self = Self("    ");

    /// Two spaces, for RAML and other YAML documents.
    pub const YAML: Self = Self("  ");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::PYTHON
    }
}
