// ABOUTME: RemoveMember: drops a member from the cluster, the platform and the status.
// ABOUTME: Each step tolerates the member already being partially removed.

use async_trait::async_trait;

use super::{Action, Target};
use crate::platform::ignore_not_found;
use crate::reconcile::context::ActionContext;
use crate::reconcile::error::ActionError;
use crate::reconcile::mutation::StatusMutation;
use crate::types::ServerGroup;

pub struct RemoveMemberAction {
    target: Target,
}

impl RemoveMemberAction {
    pub(super) fn new(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Action for RemoveMemberAction {
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        let Some(member) = ctx.member(group, id).cloned() else {
            tracing::debug!(parent: &self.target.span, "Member already removed");
            return Ok(true);
        };

        if matches!(group, ServerGroup::DBServers | ServerGroup::Coordinators) {
            let cluster = ctx.cluster().await?;
            match cluster.remove_server(id.as_str()).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    tracing::debug!(parent: &self.target.span, "Server not registered in cluster");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let pod = ctx.pod_name(group, id);
        ignore_not_found(ctx.pods().delete_pod(&pod).await)?;
        if let Some(claim) = &member.pvc_name {
            ignore_not_found(ctx.pods().delete_volume_claim(claim).await)?;
        }

        ctx.apply(StatusMutation::RemoveMember {
            group,
            id: id.clone(),
        });
        tracing::info!(parent: &self.target.span, "Removed member {}", id);
        Ok(true)
    }

    async fn check_progress(&self, _ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        Ok(true)
    }
}
