// ABOUTME: Secret access on the orchestration platform.
// ABOUTME: Used by verification helpers waiting for secrets to appear or vanish.

use async_trait::async_trait;
use std::collections::BTreeMap;

use super::error::PlatformError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
pub trait SecretOps: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<Secret, PlatformError>;

    async fn delete_secret(&self, name: &str) -> Result<(), PlatformError>;
}
