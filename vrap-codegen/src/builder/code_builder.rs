//! Code builder utility for generating properly indented text.

use super::Indent;

/// Line-oriented text builder tracking an indentation level.
///
/// The `push_*` methods take `&mut self` and suit loops and conditionals.
/// `line`, `blank` and `each` consume and return the builder, for short
/// files written as one expression.
///
/// ```
/// use vrap_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::python()
///     .line("# header")
///     .blank()
///     .each(["a", "b"], |b, name| b.line(&format!("from .{} import *", name)))
///     .build();
///
/// assert_eq!(code, "# header\n\nfrom .a import *\nfrom .b import *\n");
/// ```
///
/// ```
/// use vrap_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::yaml();
/// builder.push_line("properties:").push_indent();
/// for name in ["id", "version"] {
///     builder.push_line(&format!("{}:", name));
/// }
/// assert_eq!(builder.build(), "properties:\n  id:\n  version:\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Create a new CodeBuilder with 4-space indentation.
    pub fn python() -> Self {
        Self::new(Indent::PYTHON)
    }

    /// Create a new CodeBuilder with 2-space indentation.
    pub fn yaml() -> Self {
        Self::new(Indent::YAML)
    }

    // =========================================================================
    // Mutable API - methods prefixed with `push_`
    // =========================================================================

    /// Add a line of code with current indentation (mutable).
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add every line of a multi-line text at the current indentation (mutable).
    ///
    /// Empty lines stay empty rather than carrying trailing whitespace.
    pub fn push_lines(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.push_blank();
            } else {
                self.push_line(line);
            }
        }
        self
    }

    /// Add a blank line (mutable).
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level (mutable).
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level (mutable).
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a Python docstring (mutable).
    pub fn push_docstring(&mut self, text: &str) -> &mut Self {
        let text = text.trim();
        if text.lines().count() <= 1 {
            return self.push_line(&format!("\"\"\"{}\"\"\"", text));
        }
        self.push_line("\"\"\"").push_lines(text).push_line("\"\"\"")
    }

    // =========================================================================
    // Consuming API
    // =========================================================================

    /// Add a line of code with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::python()
    }
}
