//! Generate command report data structures.

use std::path::PathBuf;

use serde::Serialize;
use vrap_codegen::{GenerationReport, UnitFailure};
use vrap_manifest::Target;

use super::output::{Output, Report};

/// Report data from a generate run.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    /// API title from the model.
    pub title: String,

    pub target: Target,

    /// Human readable target description.
    pub description: String,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of generation.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug, Serialize)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    pub report: GenerationReport,
}

/// Result of a dry-run preview.
#[derive(Debug, Serialize)]
pub struct PreviewResult {
    /// Paths that would be written, in enumeration order.
    pub files: Vec<String>,
    /// Render failures seen while enumerating.
    pub failures: Vec<UnitFailure>,
}

impl GenerateReport {
    /// Whether every unit was rendered (and written, outside a dry run).
    pub fn is_success(&self) -> bool {
        match &self.result {
            GenerationResult::Written(written) => written.report.is_success(),
            GenerationResult::Preview(preview) => preview.failures.is_empty(),
        }
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("{} ({})", self.title, self.description));
        out.newline();

        match &self.result {
            GenerationResult::Written(written) => render_written(out, written),
            GenerationResult::Preview(preview) => render_preview(out, preview),
        }
    }
}

fn render_written(out: &mut dyn Output, written: &WrittenResult) {
    let report = &written.report;

    if !report.clean_succeeded {
        out.warning(&format!(
            "could not clean {}, stale files may remain",
            written.output_dir.display()
        ));
    }
    for path in &report.collisions {
        out.warning(&format!("{} was generated more than once", path));
    }
    if !report.post_clean_succeeded {
        out.warning("post-clean failed");
    }

    out.key_value("Generated", &written.output_dir.display().to_string());
    out.key_value_indented("written", &report.written.to_string());
    out.key_value_indented("attempted", &report.attempted.to_string());
    render_failures(out, &report.failures);

    if let Some(reason) = &report.aborted {
        out.newline();
        out.error(&format!("generation aborted: {}", reason));
    }
}

fn render_preview(out: &mut dyn Output, preview: &PreviewResult) {
    out.section("Files");
    for file in &preview.files {
        out.list_item(file);
    }
    render_failures(out, &preview.failures);

    out.newline();
    out.preformatted(&format!(
        "{} files would be generated",
        preview.files.len()
    ));
}

fn render_failures(out: &mut dyn Output, failures: &[UnitFailure]) {
    if failures.is_empty() {
        return;
    }
    out.newline();
    out.section(&format!("Failures ({})", failures.len()));
    for failure in failures {
        out.list_item(&format!(
            "[{}] {}: {}",
            failure.stage, failure.target, failure.message
        ));
    }
}
