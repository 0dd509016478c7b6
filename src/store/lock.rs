// ABOUTME: Exclusive lock on a file-backed deployment store.
// ABOUTME: Atomic lock file creation; stale (>1h) or forced locks are broken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::StoreError;

/// Information about who holds a store lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine running the reconciler.
    pub holder: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    /// Store file the lock guards.
    pub resource: String,
}

impl LockInfo {
    pub fn new(resource: &Path) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            resource: resource.display().to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }

    /// Path of the lock file guarding a store file.
    pub fn lock_path(resource: &Path) -> PathBuf {
        let mut name = resource.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

/// A held store lock; the lock file is removed on drop.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the lock for a store file.
    ///
    /// Creation uses `create_new`, so two reconcilers racing for the same
    /// store cannot both succeed. A stale, unreadable or (with `force`)
    /// live lock is broken once and acquisition retried.
    pub fn acquire(resource: &Path, force: bool) -> Result<Self, StoreError> {
        let path = LockInfo::lock_path(resource);
        let info = LockInfo::new(resource);

        if Self::try_create(&path, &info)? {
            return Ok(Self { path });
        }

        match Self::read_existing(&path) {
            Some(existing) if !force && !existing.is_stale() => {
                return Err(StoreError::LockHeld {
                    holder: existing.holder,
                    pid: existing.pid,
                    started_at: existing.started_at,
                });
            }
            Some(existing) => {
                tracing::warn!(
                    "Breaking store lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
            }
            None => tracing::warn!("Store lock info unreadable, breaking lock"),
        }

        let _ = std::fs::remove_file(&path);
        if Self::try_create(&path, &info)? {
            return Ok(Self { path });
        }

        Err(StoreError::Lock {
            path,
            message: "lock acquired by another process during break".to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns false if the lock file already exists.
    fn try_create(path: &Path, info: &LockInfo) -> Result<bool, StoreError> {
        let json = serde_json::to_string(info).map_err(|e| StoreError::Lock {
            path: path.to_path_buf(),
            message: format!("failed to serialize lock: {}", e),
        })?;

        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                file.write_all(json.as_bytes())?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn read_existing(path: &Path) -> Option<LockInfo> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to release store lock {}: {}", self.path.display(), e);
        }
    }
}
