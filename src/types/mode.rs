// ABOUTME: Deployment mode (Cluster, Single, ResilientSingle).
// ABOUTME: Unknown persisted values are carried through so callers can reject them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topology of a deployment.
///
/// A mode written by a newer schema is kept as `Unrecognized` instead of
/// failing to parse, so the resource still round-trips and convergence
/// checks can report it as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentMode {
    #[default]
    Cluster,
    Single,
    ResilientSingle,
    Unrecognized(String),
}

impl DeploymentMode {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentMode::Cluster => "Cluster",
            DeploymentMode::Single => "Single",
            DeploymentMode::ResilientSingle => "ResilientSingle",
            DeploymentMode::Unrecognized(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DeploymentMode::Unrecognized(_))
    }
}

impl From<String> for DeploymentMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Cluster" => DeploymentMode::Cluster,
            "Single" => DeploymentMode::Single,
            "ResilientSingle" => DeploymentMode::ResilientSingle,
            _ => DeploymentMode::Unrecognized(value),
        }
    }
}

impl From<DeploymentMode> for String {
    fn from(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
