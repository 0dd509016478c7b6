// ABOUTME: In-process fake of the database cluster and its connection factory.
// ABOUTME: Scriptable health, version answers and clean-out progress; records every call.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use arangodeploy::api::ArangoDeployment;
use arangodeploy::client::{
    ClientError, ClusterHandle, ClusterHealth, ConnectionFactory, DatabaseClient, ServerHealth,
    ServerRole, ServerStatus, VersionInfo,
};
use arangodeploy::types::{MemberId, ServerGroup};

/// Key for version answers of the deployment-wide client.
pub const DEPLOYMENT: &str = "<deployment>";

#[derive(Default)]
struct State {
    health: ClusterHealth,
    versions: HashMap<String, VecDeque<Result<VersionInfo, ClientError>>>,
    cleaned_out: HashSet<String>,
    calls: Vec<String>,
    hang: bool,
    unreachable: HashSet<String>,
    fail_clean_out: bool,
}

#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl FakeCluster {
    /// Report `id` in cluster health with the given role and status.
    pub fn set_server(&self, id: &str, role: ServerRole, status: ServerStatus) {
        self.state
            .lock()
            .health
            .health
            .insert(id.to_string(), ServerHealth::new(role, status));
    }

    /// Queue version answers for `key` (a member id or [`DEPLOYMENT`]).
    /// Once the queue is empty the server answers 3.4.2.
    pub fn push_versions(&self, key: &str, answers: Vec<Result<VersionInfo, ClientError>>) {
        self.state
            .lock()
            .versions
            .entry(key.to_string())
            .or_default()
            .extend(answers);
    }

    /// Version and shutdown requests to `key` fail until further notice.
    pub fn set_unreachable(&self, key: &str, unreachable: bool) {
        let mut state = self.state.lock();
        if unreachable {
            state.unreachable.insert(key.to_string());
        } else {
            state.unreachable.remove(key);
        }
    }

    pub fn finish_clean_out(&self, id: &str) {
        self.state.lock().cleaned_out.insert(id.to_string());
    }

    pub fn fail_clean_out(&self, fail: bool) {
        self.state.lock().fail_clean_out = fail;
    }

    /// Every request blocks forever.
    pub fn hang(&self) {
        self.state.lock().hang = true;
    }

    /// Calls made so far, e.g. `clean_out:PRMR-1`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn client(&self, key: &str) -> Arc<dyn DatabaseClient> {
        Arc::new(FakeClient {
            cluster: self.clone(),
            key: key.to_string(),
        })
    }

    async fn enter(&self, call: String) {
        let hang = {
            let mut state = self.state.lock();
            state.calls.push(call);
            state.hang
        };
        if hang {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl ConnectionFactory for FakeCluster {
    async fn deployment_client(
        &self,
        _deployment: &ArangoDeployment,
    ) -> Result<Arc<dyn DatabaseClient>, ClientError> {
        Ok(self.client(DEPLOYMENT))
    }

    async fn member_client(
        &self,
        _deployment: &ArangoDeployment,
        _group: ServerGroup,
        member_id: &MemberId,
    ) -> Result<Arc<dyn DatabaseClient>, ClientError> {
        Ok(self.client(member_id.as_str()))
    }
}

struct FakeClient {
    cluster: FakeCluster,
    key: String,
}

#[async_trait]
impl DatabaseClient for FakeClient {
    async fn cluster(&self) -> Result<Arc<dyn ClusterHandle>, ClientError> {
        Ok(Arc::new(FakeClient {
            cluster: self.cluster.clone(),
            key: self.key.clone(),
        }))
    }

    async fn version(&self) -> Result<VersionInfo, ClientError> {
        self.cluster.enter(format!("version:{}", self.key)).await;
        let mut state = self.cluster.state.lock();
        if state.unreachable.contains(&self.key) {
            return Err(ClientError::Connection(format!("{} unreachable", self.key)));
        }
        match state.versions.get_mut(&self.key).and_then(|q| q.pop_front()) {
            Some(answer) => answer,
            None => Ok(VersionInfo::new("3.4.2")),
        }
    }

    async fn shutdown(&self, _remove_from_cluster: bool) -> Result<(), ClientError> {
        self.cluster.enter(format!("shutdown:{}", self.key)).await;
        if self.cluster.state.lock().unreachable.contains(&self.key) {
            return Err(ClientError::Connection(format!("{} unreachable", self.key)));
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterHandle for FakeClient {
    async fn health(&self) -> Result<ClusterHealth, ClientError> {
        self.cluster.enter("health".to_string()).await;
        Ok(self.cluster.state.lock().health.clone())
    }

    async fn clean_out_server(&self, server_id: &str) -> Result<(), ClientError> {
        self.cluster.enter(format!("clean_out:{server_id}")).await;
        if self.cluster.state.lock().fail_clean_out {
            return Err(ClientError::Response {
                status: 500,
                error_num: 1,
                message: "clean out rejected".to_string(),
            });
        }
        Ok(())
    }

    async fn is_cleaned_out(&self, server_id: &str) -> Result<bool, ClientError> {
        self.cluster.enter(format!("is_cleaned_out:{server_id}")).await;
        Ok(self.cluster.state.lock().cleaned_out.contains(server_id))
    }

    async fn remove_server(&self, server_id: &str) -> Result<(), ClientError> {
        self.cluster.enter(format!("remove_server:{server_id}")).await;
        let mut state = self.cluster.state.lock();
        match state.health.health.remove(server_id) {
            Some(_) => Ok(()),
            None => Err(ClientError::NotFound(server_id.to_string())),
        }
    }
}
