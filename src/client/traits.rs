// ABOUTME: Capability traits for talking to a database deployment.
// ABOUTME: DatabaseClient, ClusterHandle and the member-scoped ConnectionFactory.

use async_trait::async_trait;
use std::sync::Arc;

use super::error::ClientError;
use super::health::ClusterHealth;
use super::version::VersionInfo;
use crate::api::ArangoDeployment;
use crate::types::{MemberId, ServerGroup};

/// A connection to one server, or to the deployment as a whole.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Cluster-level operations. Fails when the server is not part of a
    /// cluster.
    async fn cluster(&self) -> Result<Arc<dyn ClusterHandle>, ClientError>;

    /// Server version; `ClientError::NoLeader` while a resilient single
    /// topology has no elected leader.
    async fn version(&self) -> Result<VersionInfo, ClientError>;

    /// Ask the server to shut down gracefully.
    async fn shutdown(&self, remove_from_cluster: bool) -> Result<(), ClientError>;
}

/// Cluster administration operations.
#[async_trait]
pub trait ClusterHandle: Send + Sync {
    async fn health(&self) -> Result<ClusterHealth, ClientError>;

    /// Start moving all shards off a DB-server.
    async fn clean_out_server(&self, server_id: &str) -> Result<(), ClientError>;

    /// Whether a DB-server holds no more shards after a clean out.
    async fn is_cleaned_out(&self, server_id: &str) -> Result<bool, ClientError>;

    /// Remove a (stopped or cleaned out) server from the cluster registry.
    async fn remove_server(&self, server_id: &str) -> Result<(), ClientError>;
}

/// Opens clients for a deployment or a single member of it.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn deployment_client(
        &self,
        deployment: &ArangoDeployment,
    ) -> Result<Arc<dyn DatabaseClient>, ClientError>;

    async fn member_client(
        &self,
        deployment: &ArangoDeployment,
        group: ServerGroup,
        member_id: &MemberId,
    ) -> Result<Arc<dyn DatabaseClient>, ClientError>;
}
