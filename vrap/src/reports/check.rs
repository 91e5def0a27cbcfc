//! Check command report data structures.

use std::path::PathBuf;

use vrap_manifest::Target;

use super::output::{Output, Report};

/// Report data from configuration and model validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Path to the API model.
    pub api_path: PathBuf,
    /// API title from the model.
    pub title: String,
    pub target: Target,
    /// Entities per renderer category.
    pub counts: Vec<(&'static str, usize)>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!(
            "✓ {} and {} are valid",
            self.config_path.display(),
            self.api_path.display()
        ));
        out.newline();

        out.key_value("API", &self.title);
        out.key_value("Target", self.target.as_str());
        out.newline();

        out.section("Entities");
        for (category, count) in &self.counts {
            out.key_value_indented(category, &count.to_string());
        }
    }
}
