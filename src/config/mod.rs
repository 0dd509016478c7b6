// ABOUTME: Configuration types and parsing for arangodeploy.yml.
// ABOUTME: Handles discovery, YAML parsing and writing starter files.

mod endpoints;
mod env_value;
mod executor;
mod verify;

pub use endpoints::EndpointsConfig;
pub use env_value::EnvValue;
pub use executor::ExecutorConfig;
pub use verify::VerifyConfig;

use crate::api::{ArangoDeployment, DeploymentSpec};
use crate::error::{Error, Result};
use crate::store::FileStatusStore;
use crate::types::DeploymentMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "arangodeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "arangodeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".arangodeploy/config.yml";

const DEFAULT_RESOURCE: &str = "deployment.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// File holding the managed deployment resource, relative to the config.
    #[serde(default = "default_resource")]
    pub resource: PathBuf,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub verify: VerifyConfig,

    /// Directory the config was loaded from.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_resource() -> PathBuf {
    PathBuf::from(DEFAULT_RESOURCE)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        // .arangodeploy/config.yml resolves relative to the project directory.
        config.base_dir = match path.parent() {
            Some(p) if p.ends_with(".arangodeploy") => p.parent().unwrap_or(p).to_path_buf(),
            Some(p) => p.to_path_buf(),
            None => PathBuf::new(),
        };
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Absolute (or config-relative) path of the resource file.
    pub fn resource_path(&self) -> PathBuf {
        if self.resource.is_absolute() {
            self.resource.clone()
        } else {
            self.base_dir.join(&self.resource)
        }
    }

    fn validate(&self) -> Result<()> {
        let multiplier = self.verify.backoff.multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(Error::InvalidConfig(
                "verify.backoff.multiplier must be a finite number of at least 1.0".to_string(),
            ));
        }
        if self.executor.call_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "executor.call_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn template() -> Self {
        Config {
            resource: default_resource(),
            endpoints: EndpointsConfig::default(),
            executor: ExecutorConfig::default(),
            verify: VerifyConfig::default(),
            base_dir: PathBuf::new(),
        }
    }
}

/// Write a starter config and resource file into `dir`.
pub fn init_config(dir: &Path, name: &str, mode: DeploymentMode, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);
    let resource_path = dir.join(DEFAULT_RESOURCE);

    if !force {
        for path in [&config_path, &resource_path] {
            if path.exists() {
                return Err(Error::AlreadyExists(path.clone()));
            }
        }
    }

    if name.is_empty() {
        return Err(Error::InvalidConfig("deployment name cannot be empty".to_string()));
    }

    std::fs::write(&config_path, generate_template_yaml(&Config::template()))?;
    FileStatusStore::create(&resource_path, ArangoDeployment::new(name, DeploymentSpec::new(mode)))?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"resource: {}
endpoints:
  cluster: "{}"
  member: "{}"
  # token:
  #   env: ARANGO_JWT
executor:
  call_timeout: 30s
  conflict_retries: {}
verify:
  ready_timeout: 2m
"#,
        config.resource.display(),
        config.endpoints.cluster,
        config.endpoints.member,
        config.executor.conflict_retries,
    )
}
