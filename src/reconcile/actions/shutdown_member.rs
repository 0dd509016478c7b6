// ABOUTME: ShutdownMember: stops a member's server without removing the member.
// ABOUTME: Graceful shutdown request first, pod deletion as the fallback.

use async_trait::async_trait;

use super::{Action, Target, request_shutdown};
use crate::api::MemberPhase;
use crate::platform::ignore_not_found;
use crate::reconcile::context::ActionContext;
use crate::reconcile::error::ActionError;

pub struct ShutdownMemberAction {
    target: Target,
}

impl ShutdownMemberAction {
    pub(super) fn new(target: Target) -> Self {
        Self { target }
    }

    /// Pod is gone or its server has exited.
    async fn is_stopped(&self, ctx: &ActionContext<'_>) -> Result<bool, ActionError> {
        let pod = ctx.pod_name(self.target.group, &self.target.member_id);
        Ok(match ctx.pods().pod_state(&pod).await? {
            None => true,
            Some(state) => state.is_terminated(),
        })
    }
}

#[async_trait]
impl Action for ShutdownMemberAction {
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        if !self.target.exists(ctx) || self.is_stopped(ctx).await? {
            return Ok(true);
        }

        if !request_shutdown(ctx, &self.target).await {
            let pod = ctx.pod_name(group, id);
            ignore_not_found(ctx.pods().delete_pod(&pod).await)?;
        }
        ctx.set_member_phase(group, id, MemberPhase::ShuttingDown);
        tracing::info!(parent: &self.target.span, "Shutting down {}", id);
        Ok(false)
    }

    async fn check_progress(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        if !self.target.exists(ctx) {
            return Ok(true);
        }
        self.is_stopped(ctx).await
    }
}
