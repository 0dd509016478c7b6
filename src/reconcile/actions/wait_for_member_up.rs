// ABOUTME: WaitForMemberUp: blocks the plan until a member serves requests again.
// ABOUTME: What "up" means depends on the deployment mode and the member's group.

use async_trait::async_trait;

use super::{Action, Target};
use crate::api::MemberPhase;
use crate::client::ServerStatus;
use crate::reconcile::context::ActionContext;
use crate::reconcile::error::ActionError;
use crate::types::{DeploymentMode, ServerGroup};

pub struct WaitForMemberUpAction {
    target: Target,
}

impl WaitForMemberUpAction {
    pub(super) fn new(target: Target) -> Self {
        Self { target }
    }

    /// Member answers a version request. With `allow_no_leader`, a
    /// follower of a resilient single pair also counts.
    async fn responds(
        &self,
        ctx: &ActionContext<'_>,
        allow_no_leader: bool,
    ) -> Result<bool, ActionError> {
        let client = ctx
            .member_client(self.target.group, &self.target.member_id)
            .await?;
        match client.version().await {
            Ok(_) => Ok(true),
            Err(e) if allow_no_leader && e.is_no_leader() => Ok(true),
            Err(e) => {
                tracing::debug!(parent: &self.target.span, error = %e, "Member not responding yet");
                Ok(false)
            }
        }
    }

    /// Cluster health reports the member as good.
    async fn healthy_in_cluster(&self, ctx: &ActionContext<'_>) -> Result<bool, ActionError> {
        let cluster = ctx.cluster().await?;
        match cluster.health().await {
            Ok(health) => Ok(health
                .server(self.target.member_id.as_str())
                .is_some_and(|s| s.status == ServerStatus::Good)),
            Err(e) => {
                tracing::debug!(parent: &self.target.span, error = %e, "Cluster health unavailable");
                Ok(false)
            }
        }
    }

    async fn pod_ready(&self, ctx: &ActionContext<'_>) -> Result<bool, ActionError> {
        let pod = ctx.pod_name(self.target.group, &self.target.member_id);
        Ok(ctx
            .pods()
            .pod_state(&pod)
            .await?
            .is_some_and(|state| state.is_ready()))
    }
}

#[async_trait]
impl Action for WaitForMemberUpAction {
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        if !self.target.exists(ctx) {
            tracing::warn!(parent: &self.target.span, "Member not in status, nothing to wait for");
            return Ok(true);
        }
        Ok(false)
    }

    async fn check_progress(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        if !self.target.exists(ctx) {
            return Ok(true);
        }

        let up = match (ctx.mode(), group) {
            (_, ServerGroup::SyncMasters | ServerGroup::SyncWorkers) => self.pod_ready(ctx).await?,
            (DeploymentMode::ResilientSingle, ServerGroup::Single) => {
                self.responds(ctx, true).await?
            }
            (DeploymentMode::Cluster, ServerGroup::DBServers | ServerGroup::Coordinators) => {
                self.healthy_in_cluster(ctx).await?
            }
            _ => self.responds(ctx, false).await?,
        };

        if up {
            ctx.set_member_phase(group, id, MemberPhase::Created);
            tracing::info!(parent: &self.target.span, "Member {} is up", id);
        }
        Ok(up)
    }
}
