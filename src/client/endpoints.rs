// ABOUTME: ConnectionFactory that derives HTTP endpoints from name templates.
// ABOUTME: Fills {deployment}, {namespace}, {role} and {id} placeholders.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::error::ClientError;
use super::http::HttpDatabaseClient;
use super::traits::{ConnectionFactory, DatabaseClient};
use crate::api::ArangoDeployment;
use crate::config::EndpointsConfig;
use crate::error::Result;
use crate::types::{MemberId, ServerGroup};

#[derive(Debug, Clone)]
pub struct EndpointConnectionFactory {
    cluster_template: String,
    member_template: String,
    token: Option<String>,
    request_timeout: Duration,
}

impl EndpointConnectionFactory {
    pub fn new(cluster_template: impl Into<String>, member_template: impl Into<String>) -> Self {
        Self {
            cluster_template: cluster_template.into(),
            member_template: member_template.into(),
            token: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Build a factory from config, resolving an env-sourced token.
    pub fn from_config(config: &EndpointsConfig) -> Result<Self> {
        let token = config.token.as_ref().map(|t| t.resolve()).transpose()?;
        Ok(Self {
            cluster_template: config.cluster.clone(),
            member_template: config.member.clone(),
            token,
            request_timeout: config.request_timeout,
        })
    }

    /// Endpoint serving deployment-wide requests.
    pub fn cluster_endpoint(&self, deployment: &ArangoDeployment) -> String {
        render(&self.cluster_template, deployment, None)
    }

    /// Endpoint of one member.
    pub fn member_endpoint(
        &self,
        deployment: &ArangoDeployment,
        group: ServerGroup,
        member_id: &MemberId,
    ) -> String {
        render(&self.member_template, deployment, Some((group, member_id)))
    }

    fn client(&self, endpoint: &str) -> std::result::Result<Arc<dyn DatabaseClient>, ClientError> {
        let mut client = HttpDatabaseClient::new(endpoint)?.with_timeout(self.request_timeout);
        if let Some(token) = &self.token {
            client = client.with_token(token.clone());
        }
        Ok(Arc::new(client))
    }
}

fn render(
    template: &str,
    deployment: &ArangoDeployment,
    member: Option<(ServerGroup, &MemberId)>,
) -> String {
    let mut out = template
        .replace("{deployment}", deployment.name())
        .replace("{namespace}", deployment.namespace());
    if let Some((group, id)) = member {
        let id = id.as_str().to_lowercase();
        out = out
            .replace("{role}", group.as_role())
            .replace("{id}", &urlencoding::encode(&id));
    }
    out
}

#[async_trait]
impl ConnectionFactory for EndpointConnectionFactory {
    async fn deployment_client(
        &self,
        deployment: &ArangoDeployment,
    ) -> std::result::Result<Arc<dyn DatabaseClient>, ClientError> {
        self.client(&self.cluster_endpoint(deployment))
    }

    async fn member_client(
        &self,
        deployment: &ArangoDeployment,
        group: ServerGroup,
        member_id: &MemberId,
    ) -> std::result::Result<Arc<dyn DatabaseClient>, ClientError> {
        self.client(&self.member_endpoint(deployment, group, member_id))
    }
}
