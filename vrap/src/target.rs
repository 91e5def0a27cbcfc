//! Unified target dispatch.
//!
//! Centralizes target-specific generator creation and metadata.

use std::sync::Arc;

use vrap_codegen::GeneratorSet;
use vrap_manifest::{Packages, Target};
use vrap_model::ApiModel;

/// Target-specific support for code generation.
pub struct TargetSupport {
    target: Target,
    /// Short description shown in reports.
    pub description: &'static str,
}

impl TargetSupport {
    /// Get support for the given target.
    pub fn get(target: Target) -> Self {
        match target {
            Target::Python => Self {
                target,
                description: "Python SDK",
            },
            Target::RamlDoc => Self {
                target,
                description: "RAML documentation",
            },
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Create the generator set for this target.
    ///
    /// Package names only apply to the Python target.
    pub fn generator_set(&self, model: &Arc<ApiModel>, packages: &Packages) -> GeneratorSet {
        match self.target {
            Target::Python => vrap_codegen_python::generator_set(model, packages),
            Target::RamlDoc => vrap_codegen_ramldoc::generator_set(model),
        }
    }
}
