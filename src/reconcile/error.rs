// ABOUTME: Error types for plan actions and the plan executor.
// ABOUTME: Executor errors name the action (id, type, group, member) that failed.

use std::time::Duration;

use crate::api::ActionRecord;
use crate::client::ClientError;
use crate::platform::PlatformError;
use crate::store::StoreError;

/// Failure of a Start or CheckProgress call (as opposed to "not ready yet").
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("cluster request failed: {0}")]
    Client(#[from] ClientError),

    #[error("platform request failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("failed to load deployment: {0}")]
    Load(#[source] StoreError),

    #[error("failed to start {action}: {source}")]
    Start {
        action: Box<ActionRecord>,
        source: ActionError,
    },

    #[error("failed to check progress of {action}: {source}")]
    CheckProgress {
        action: Box<ActionRecord>,
        source: ActionError,
    },

    #[error("failed to persist status after {action}: {source}")]
    Persist {
        action: Box<ActionRecord>,
        source: StoreError,
    },
}

impl ExecutorError {
    /// The plan entry the error is about, if any.
    pub fn action(&self) -> Option<&ActionRecord> {
        match self {
            ExecutorError::Load(_) => None,
            ExecutorError::Start { action, .. }
            | ExecutorError::CheckProgress { action, .. }
            | ExecutorError::Persist { action, .. } => Some(action),
        }
    }
}
