// ABOUTME: Errors from deployment stores.
// ABOUTME: Conflicts are retryable; lock errors report who holds the store.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::ResourceVersion;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored resource changed since it was read.
    #[error("conflict: expected version {expected}, found {actual}")]
    Conflict {
        expected: ResourceVersion,
        actual: ResourceVersion,
    },

    #[error("deployment not found: {0}")]
    NotFound(String),

    #[error("store locked by {holder} (pid {pid}) since {started_at}")]
    LockHeld {
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    #[error("lock error for {path}: {message}")]
    Lock { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
