// ABOUTME: Execution context handed to an action for one executor tick.
// ABOUTME: Borrows the deployment exclusively and journals every status change.

use std::sync::Arc;
use tracing::Span;

use super::error::ActionError;
use super::mutation::StatusMutation;
use crate::api::{ArangoDeployment, DeploymentSpec, DeploymentStatus, MemberPhase, MemberStatus};
use crate::client::{ClusterHandle, ConnectionFactory, DatabaseClient};
use crate::platform::PodOps;
use crate::store::DeploymentStore;
use crate::types::{DeploymentMode, MemberId, ServerGroup};

/// External collaborators of the executor.
#[derive(Clone)]
pub struct Dependencies {
    pub store: Arc<dyn DeploymentStore>,
    pub connections: Arc<dyn ConnectionFactory>,
    pub pods: Arc<dyn PodOps>,
}

/// Access an action gets to the deployment and its collaborators.
///
/// The deployment is borrowed mutably for the duration of one Start or
/// CheckProgress call. Status changes must go through [`ActionContext::apply`]
/// so the executor can replay them if persisting loses a race.
pub struct ActionContext<'a> {
    deployment: &'a mut ArangoDeployment,
    deps: &'a Dependencies,
    journal: Vec<StatusMutation>,
    span: Span,
}

impl<'a> ActionContext<'a> {
    pub fn new(deployment: &'a mut ArangoDeployment, deps: &'a Dependencies, span: Span) -> Self {
        Self {
            deployment,
            deps,
            journal: Vec::new(),
            span,
        }
    }

    pub fn deployment(&self) -> &ArangoDeployment {
        self.deployment
    }

    pub fn spec(&self) -> &DeploymentSpec {
        &self.deployment.spec
    }

    pub fn status(&self) -> &DeploymentStatus {
        &self.deployment.status
    }

    pub fn mode(&self) -> &DeploymentMode {
        &self.deployment.spec.mode
    }

    pub fn member(&self, group: ServerGroup, id: &MemberId) -> Option<&MemberStatus> {
        self.deployment.status.members.find(group, id)
    }

    /// Logging context of the running action.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Apply a status change and record it for replay.
    pub fn apply(&mut self, mutation: StatusMutation) {
        mutation.apply(&mut self.deployment.status);
        self.journal.push(mutation);
    }

    /// Move a member to `phase`; no change is recorded if it is already there.
    pub fn set_member_phase(&mut self, group: ServerGroup, id: &MemberId, phase: MemberPhase) {
        if self.member(group, id).is_some_and(|m| m.phase != phase) {
            self.apply(StatusMutation::SetMemberPhase {
                group,
                id: id.clone(),
                phase,
            });
        }
    }

    pub fn pods(&self) -> &dyn PodOps {
        self.deps.pods.as_ref()
    }

    pub fn pod_name(&self, group: ServerGroup, id: &MemberId) -> String {
        self.deployment.pod_name(group, id)
    }

    pub async fn deployment_client(&self) -> Result<Arc<dyn DatabaseClient>, ActionError> {
        Ok(self
            .deps
            .connections
            .deployment_client(self.deployment)
            .await?)
    }

    pub async fn member_client(
        &self,
        group: ServerGroup,
        id: &MemberId,
    ) -> Result<Arc<dyn DatabaseClient>, ActionError> {
        Ok(self
            .deps
            .connections
            .member_client(self.deployment, group, id)
            .await?)
    }

    /// Cluster administration handle via the deployment-wide client.
    pub async fn cluster(&self) -> Result<Arc<dyn ClusterHandle>, ActionError> {
        let client = self.deployment_client().await?;
        Ok(client.cluster().await?)
    }

    pub(super) fn into_journal(self) -> Vec<StatusMutation> {
        self.journal
    }
}
