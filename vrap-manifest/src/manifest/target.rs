//! Generation targets.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Supported generation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    /// Python SDK (models, request builders, client)
    Python,
    /// RAML documentation tree
    RamlDoc,
}

impl Target {
    /// All targets, in display order.
    pub const ALL: [Target; 2] = [Target::Python, Target::RamlDoc];

    /// Returns the target identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Python => "python",
            Target::RamlDoc => "ramldoc",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Target::Python),
            "ramldoc" | "raml" => Ok(Target::RamlDoc),
            _ => Err(format!(
                "unknown target '{}', expected 'python' or 'ramldoc'",
                s
            )),
        }
    }
}

impl TryFrom<String> for Target {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.as_str().to_string()
    }
}
