// ABOUTME: Credentials given literally or read from an environment variable.
// ABOUTME: Debug output never shows a literal secret.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// A secret config value such as the database JWT.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// The effective value. An empty variable counts as unset.
    pub fn resolve(&self) -> Result<String> {
        let (var, default) = match self {
            EnvValue::Literal(value) => return Ok(value.clone()),
            EnvValue::FromEnv { var, default } => (var, default),
        };
        std::env::var(var)
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| default.clone())
            .ok_or_else(|| Error::MissingEnvVar(var.clone()))
    }
}

impl fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Literal(_) => f.write_str("Literal(<redacted>)"),
            EnvValue::FromEnv { var, default } => f
                .debug_struct("FromEnv")
                .field("var", var)
                .field("has_default", &default.is_some())
                .finish(),
        }
    }
}
