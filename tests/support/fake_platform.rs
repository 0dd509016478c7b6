// ABOUTME: In-process fake of the orchestration platform's pods, claims and secrets.
// ABOUTME: Deleting a pod removes it at once; deletions are recorded for assertions.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arangodeploy::platform::{PlatformError, PodOps, PodState, Secret, SecretOps};

#[derive(Default)]
struct State {
    pods: HashMap<String, PodState>,
    claims: HashSet<String>,
    secrets: HashMap<String, Secret>,
    deleted_pods: Vec<String>,
    deleted_claims: Vec<String>,
    secret_reads: usize,
    fail: bool,
}

#[derive(Clone, Default)]
pub struct FakePlatform {
    state: Arc<Mutex<State>>,
}

impl FakePlatform {
    pub fn set_pod(&self, name: &str, state: PodState) {
        self.state.lock().pods.insert(name.to_string(), state);
    }

    pub fn pod(&self, name: &str) -> Option<PodState> {
        self.state.lock().pods.get(name).copied()
    }

    pub fn add_claim(&self, name: &str) {
        self.state.lock().claims.insert(name.to_string());
    }

    pub fn has_claim(&self, name: &str) -> bool {
        self.state.lock().claims.contains(name)
    }

    pub fn deleted_pods(&self) -> Vec<String> {
        self.state.lock().deleted_pods.clone()
    }

    pub fn deleted_claims(&self) -> Vec<String> {
        self.state.lock().deleted_claims.clone()
    }

    pub fn put_secret(&self, secret: Secret) {
        self.state.lock().secrets.insert(secret.name.clone(), secret);
    }

    pub fn has_secret(&self, name: &str) -> bool {
        self.state.lock().secrets.contains_key(name)
    }

    pub fn secret_reads(&self) -> usize {
        self.state.lock().secret_reads
    }

    /// Every operation fails with an API error.
    pub fn fail(&self, fail: bool) {
        self.state.lock().fail = fail;
    }

    fn check(&self) -> Result<(), PlatformError> {
        if self.state.lock().fail {
            return Err(PlatformError::Api("platform unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PodOps for FakePlatform {
    async fn pod_state(&self, name: &str) -> Result<Option<PodState>, PlatformError> {
        self.check()?;
        Ok(self.pod(name))
    }

    async fn delete_pod(&self, name: &str) -> Result<(), PlatformError> {
        self.check()?;
        let mut state = self.state.lock();
        state.deleted_pods.push(name.to_string());
        match state.pods.remove(name) {
            Some(_) => Ok(()),
            None => Err(PlatformError::NotFound {
                kind: "pod",
                name: name.to_string(),
            }),
        }
    }

    async fn delete_volume_claim(&self, name: &str) -> Result<(), PlatformError> {
        self.check()?;
        let mut state = self.state.lock();
        state.deleted_claims.push(name.to_string());
        match state.claims.remove(name) {
            true => Ok(()),
            false => Err(PlatformError::NotFound {
                kind: "persistentvolumeclaim",
                name: name.to_string(),
            }),
        }
    }
}

#[async_trait]
impl SecretOps for FakePlatform {
    async fn get_secret(&self, name: &str) -> Result<Secret, PlatformError> {
        self.check()?;
        let mut state = self.state.lock();
        state.secret_reads += 1;
        state
            .secrets
            .get(name)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound {
                kind: "secret",
                name: name.to_string(),
            })
    }

    async fn delete_secret(&self, name: &str) -> Result<(), PlatformError> {
        self.check()?;
        match self.state.lock().secrets.remove(name) {
            Some(_) => Ok(()),
            None => Err(PlatformError::NotFound {
                kind: "secret",
                name: name.to_string(),
            }),
        }
    }
}
