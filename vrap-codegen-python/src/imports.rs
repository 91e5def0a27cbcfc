//! Import blocks of generated modules.

use std::collections::{BTreeMap, BTreeSet};

use vrap_codegen::builder::CodeBuilder;

/// The imports of one module, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    modules: BTreeSet<String>,
    names: BTreeMap<String, BTreeSet<String>>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `import <module>`.
    pub fn import(&mut self, module: impl Into<String>) -> &mut Self {
        self.modules.insert(module.into());
        self
    }

    /// Add `from <module> import <name>`.
    pub fn import_from(&mut self, module: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.names
            .entry(module.into())
            .or_default()
            .insert(name.into());
        self
    }

    /// Returns true if `name` is imported from any module.
    pub fn imports_name(&self, name: &str) -> bool {
        self.names.values().any(|names| names.contains(name))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.names.is_empty()
    }

    /// Write the block: plain imports first, then `from` imports.
    pub fn push_into(&self, builder: &mut CodeBuilder) {
        for module in &self.modules {
            builder.push_line(&format!("import {}", module));
        }
        if !self.modules.is_empty() && !self.names.is_empty() {
            builder.push_blank();
        }
        for (module, names) in &self.names {
            let names: Vec<_> = names.iter().map(String::as_str).collect();
            builder.push_line(&format!("from {} import {}", module, names.join(", ")));
        }
    }
}
