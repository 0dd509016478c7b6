// ABOUTME: Deployment store backed by a YAML document on disk.
// ABOUTME: Writes are atomic (temp file + rename) and version-checked.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::lock::StoreLock;
use super::{DeploymentStore, ResourceVersion, StoreError, Versioned};
use crate::api::{ArangoDeployment, DeploymentSpec, DeploymentStatus};

/// On-disk layout: the resource plus its version counter.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    resource_version: ResourceVersion,
    #[serde(flatten)]
    deployment: ArangoDeployment,
}

#[derive(Debug)]
pub struct FileStatusStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write: Mutex<()>,
    _lock: Option<StoreLock>,
}

impl FileStatusStore {
    /// Open an existing store file for reading and unlocked writes.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path,
            write: Mutex::new(()),
            _lock: None,
        })
    }

    /// Open a store file and hold its lock for the lifetime of the store,
    /// making this process the only reconciler of the resource.
    pub fn open_exclusive(path: impl Into<PathBuf>, force: bool) -> Result<Self, StoreError> {
        let mut store = Self::open(path)?;
        store._lock = Some(StoreLock::acquire(&store.path, force)?);
        Ok(store)
    }

    /// Write a new store file at version 1.
    pub fn create(path: impl Into<PathBuf>, deployment: ArangoDeployment) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = Document {
            resource_version: ResourceVersion(1),
            deployment,
        };
        write_atomic_sync(&path, &doc)?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Document, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_yaml::from_str(&content)?)
    }

    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(doc)?;
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, yaml).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn update(
        &self,
        expected: ResourceVersion,
        apply: impl FnOnce(&mut ArangoDeployment),
    ) -> Result<ResourceVersion, StoreError> {
        let _guard = self.write.lock().await;
        let mut doc = self.read().await?;
        if doc.resource_version != expected {
            return Err(StoreError::Conflict {
                expected,
                actual: doc.resource_version,
            });
        }
        apply(&mut doc.deployment);
        doc.resource_version = doc.resource_version.next();
        self.write(&doc).await?;
        Ok(doc.resource_version)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomic_sync(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(doc)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl DeploymentStore for FileStatusStore {
    async fn get(&self) -> Result<Versioned<ArangoDeployment>, StoreError> {
        let doc = self.read().await?;
        Ok(Versioned {
            value: doc.deployment,
            version: doc.resource_version,
        })
    }

    async fn update_status(
        &self,
        status: &DeploymentStatus,
        expected: ResourceVersion,
    ) -> Result<ResourceVersion, StoreError> {
        self.update(expected, |d| d.status = status.clone()).await
    }

    async fn update_spec(
        &self,
        spec: &DeploymentSpec,
        expected: ResourceVersion,
    ) -> Result<ResourceVersion, StoreError> {
        self.update(expected, |d| d.spec = spec.clone()).await
    }

    async fn delete(&self) -> Result<(), StoreError> {
        let _guard = self.write.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
