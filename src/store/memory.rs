// ABOUTME: In-process deployment store with a history of persisted statuses.
// ABOUTME: Supports external writes and injected conflicts for simulating races.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{DeploymentStore, ResourceVersion, StoreError, Versioned};
use crate::api::{ArangoDeployment, DeploymentSpec, DeploymentStatus};

#[derive(Debug)]
struct Inner {
    deployment: Option<ArangoDeployment>,
    name: String,
    version: ResourceVersion,
    history: Vec<DeploymentStatus>,
    pending_conflicts: u32,
}

#[derive(Debug)]
pub struct MemoryStatusStore {
    inner: Mutex<Inner>,
}

impl MemoryStatusStore {
    pub fn new(deployment: ArangoDeployment) -> Self {
        Self {
            inner: Mutex::new(Inner {
                name: deployment.name().to_string(),
                deployment: Some(deployment),
                version: ResourceVersion(1),
                history: Vec::new(),
                pending_conflicts: 0,
            }),
        }
    }

    /// Current stored resource, if not deleted.
    pub fn snapshot(&self) -> Option<ArangoDeployment> {
        self.inner.lock().deployment.clone()
    }

    pub fn version(&self) -> ResourceVersion {
        self.inner.lock().version
    }

    /// Every status successfully written through `update_status`, oldest first.
    pub fn status_history(&self) -> Vec<DeploymentStatus> {
        self.inner.lock().history.clone()
    }

    /// Make the next `count` status updates lose a race against a
    /// concurrent writer: the version moves on and the update conflicts.
    pub fn inject_conflicts(&self, count: u32) {
        self.inner.lock().pending_conflicts = count;
    }

    /// Apply a change as an external writer would, bumping the version.
    pub fn modify(&self, f: impl FnOnce(&mut ArangoDeployment)) {
        let mut inner = self.inner.lock();
        if let Some(deployment) = inner.deployment.as_mut() {
            f(deployment);
            inner.version = inner.version.next();
        }
    }

    fn check_version(inner: &mut Inner, expected: ResourceVersion) -> Result<(), StoreError> {
        if inner.pending_conflicts > 0 {
            inner.pending_conflicts -= 1;
            inner.version = inner.version.next();
        }
        if inner.version != expected {
            return Err(StoreError::Conflict {
                expected,
                actual: inner.version,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DeploymentStore for MemoryStatusStore {
    async fn get(&self) -> Result<Versioned<ArangoDeployment>, StoreError> {
        let inner = self.inner.lock();
        match &inner.deployment {
            Some(d) => Ok(Versioned {
                value: d.clone(),
                version: inner.version,
            }),
            None => Err(StoreError::NotFound(inner.name.clone())),
        }
    }

    async fn update_status(
        &self,
        status: &DeploymentStatus,
        expected: ResourceVersion,
    ) -> Result<ResourceVersion, StoreError> {
        let mut inner = self.inner.lock();
        if inner.deployment.is_none() {
            return Err(StoreError::NotFound(inner.name.clone()));
        }
        Self::check_version(&mut inner, expected)?;

        inner.version = inner.version.next();
        inner.history.push(status.clone());
        if let Some(d) = inner.deployment.as_mut() {
            d.status = status.clone();
        }
        Ok(inner.version)
    }

    async fn update_spec(
        &self,
        spec: &DeploymentSpec,
        expected: ResourceVersion,
    ) -> Result<ResourceVersion, StoreError> {
        let mut inner = self.inner.lock();
        if inner.deployment.is_none() {
            return Err(StoreError::NotFound(inner.name.clone()));
        }
        Self::check_version(&mut inner, expected)?;

        inner.version = inner.version.next();
        if let Some(d) = inner.deployment.as_mut() {
            d.spec = spec.clone();
        }
        Ok(inner.version)
    }

    async fn delete(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        match inner.deployment.take() {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(inner.name.clone())),
        }
    }
}
