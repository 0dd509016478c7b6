// ABOUTME: Pod and volume claim operations on the orchestration platform.
// ABOUTME: Pod state is reduced to what the member actions need to decide readiness.

use async_trait::async_trait;

use super::error::PlatformError;

/// Lifecycle state of a member pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodState {
    Pending,
    Running { ready: bool },
    /// Deletion requested, containers still stopping.
    Terminating,
    Succeeded,
    Failed,
}

impl PodState {
    /// Whether no server process is running in the pod anymore.
    pub fn is_terminated(&self) -> bool {
        matches!(self, PodState::Succeeded | PodState::Failed)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PodState::Running { ready: true })
    }
}

#[async_trait]
pub trait PodOps: Send + Sync {
    /// Current state of a pod, `None` if it does not exist.
    async fn pod_state(&self, name: &str) -> Result<Option<PodState>, PlatformError>;

    async fn delete_pod(&self, name: &str) -> Result<(), PlatformError>;

    async fn delete_volume_claim(&self, name: &str) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_finished_pods_are_terminated() {
        assert!(PodState::Succeeded.is_terminated());
        assert!(PodState::Failed.is_terminated());
        assert!(!PodState::Terminating.is_terminated());
        assert!(!PodState::Running { ready: false }.is_terminated());
    }

    #[test]
    fn ready_requires_running_and_ready() {
        assert!(PodState::Running { ready: true }.is_ready());
        assert!(!PodState::Running { ready: false }.is_ready());
        assert!(!PodState::Pending.is_ready());
    }
}
