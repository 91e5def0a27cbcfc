//! The outcome of a generation run.

use std::fmt;

use serde::Serialize;

use crate::generation::RenderFailure;

/// Where a unit failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// The renderer or producer failed before yielding a file.
    Render,
    /// The sink failed to persist the file.
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Render => write!(f, "render"),
            FailureStage::Write => write!(f, "write"),
        }
    }
}

/// One failed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub stage: FailureStage,
    /// The file path for write failures, the rendered entity for render failures.
    pub target: String,
    pub message: String,
}

impl UnitFailure {
    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Write,
            target: path.into(),
            message: message.into(),
        }
    }
}

impl From<RenderFailure> for UnitFailure {
    fn from(failure: RenderFailure) -> Self {
        Self {
            stage: FailureStage::Render,
            target: failure.target,
            message: failure.message,
        }
    }
}

/// Aggregate result of [`CoreCodeGenerator::generate`](crate::CoreCodeGenerator::generate).
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    /// Units handed to the sink, including failed writes.
    pub attempted: usize,
    /// Units the sink persisted.
    pub written: usize,
    pub failures: Vec<UnitFailure>,
    /// Relative paths enumerated more than once (only with collision detection).
    pub collisions: Vec<String>,
    /// Why enumeration stopped early, if it did.
    pub aborted: Option<String>,
    pub clean_succeeded: bool,
    pub post_clean_succeeded: bool,
}

impl GenerationReport {
    /// Returns true if every unit was rendered and written.
    ///
    /// Clean and post-clean results don't affect success.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none()
    }

    /// Failures of the given stage.
    pub fn failures_at(&self, stage: FailureStage) -> impl Iterator<Item = &UnitFailure> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let mut report = GenerationReport {
            attempted: 2,
            written: 2,
            ..Default::default()
        };
        assert!(report.is_success());

        report.aborted = Some("stopped".to_string());
        assert!(!report.is_success());

        report.aborted = None;
        report.failures.push(UnitFailure::write("a.py", "denied"));
        assert!(!report.is_success());
    }

    #[test]
    fn test_failures_at() {
        let report = GenerationReport {
            failures: vec![
                UnitFailure::write("a.py", "denied"),
                RenderFailure {
                    target: "object type 'Cart'".to_string(),
                    message: "boom".to_string(),
                }
                .into(),
            ],
            ..Default::default()
        };

        assert_eq!(report.failures_at(FailureStage::Write).count(), 1);
        let render: Vec<_> = report.failures_at(FailureStage::Render).collect();
        assert_eq!(render[0].target, "object type 'Cart'");
    }

    #[test]
    fn test_serializes_stage_lowercase() {
        let json = serde_json::to_value(UnitFailure::write("a.py", "denied")).unwrap();
        assert_eq!(json["stage"], "write");
        assert_eq!(json["target"], "a.py");
    }
}
