// ABOUTME: Durable storage of the managed deployment resource.
// ABOUTME: Read-current / write-if-unchanged semantics with resource versions.

mod error;
mod file;
mod lock;
mod memory;

pub use error::StoreError;
pub use file::FileStatusStore;
pub use lock::{LockInfo, StoreLock};
pub use memory::MemoryStatusStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::{ArangoDeployment, DeploymentSpec, DeploymentStatus};

/// Monotonic version of a stored resource, bumped on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVersion(pub u64);

impl ResourceVersion {
    pub fn next(self) -> Self {
        ResourceVersion(self.0 + 1)
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value together with the version it was read at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: ResourceVersion,
}

/// Store holding one managed deployment.
///
/// Updates carry the version the caller last read. If the stored version
/// moved on, the update fails with `StoreError::Conflict` and the caller
/// must re-read and reapply its change.
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    async fn get(&self) -> Result<Versioned<ArangoDeployment>, StoreError>;

    async fn update_status(
        &self,
        status: &DeploymentStatus,
        expected: ResourceVersion,
    ) -> Result<ResourceVersion, StoreError>;

    async fn update_spec(
        &self,
        spec: &DeploymentSpec,
        expected: ResourceVersion,
    ) -> Result<ResourceVersion, StoreError>;

    async fn delete(&self) -> Result<(), StoreError>;
}
