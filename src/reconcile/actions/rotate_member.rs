// ABOUTME: RotateMember: replaces a member's pod so it restarts with the current spec.
// ABOUTME: Done once the old pod is gone; the replacement is awaited by WaitForMemberUp.

use async_trait::async_trait;

use super::{Action, Target, request_shutdown};
use crate::api::MemberPhase;
use crate::platform::ignore_not_found;
use crate::reconcile::context::ActionContext;
use crate::reconcile::error::ActionError;

pub struct RotateMemberAction {
    target: Target,
}

impl RotateMemberAction {
    pub(super) fn new(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Action for RotateMemberAction {
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        if !self.target.exists(ctx) {
            return Ok(true);
        }

        let pod = ctx.pod_name(group, id);
        if let Some(state) = ctx.pods().pod_state(&pod).await? {
            if !state.is_terminated() {
                request_shutdown(ctx, &self.target).await;
            }
            ignore_not_found(ctx.pods().delete_pod(&pod).await)?;
        }

        ctx.set_member_phase(group, id, MemberPhase::Rotating);
        tracing::info!(parent: &self.target.span, "Rotating {}", id);
        Ok(false)
    }

    async fn check_progress(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        if !self.target.exists(ctx) {
            return Ok(true);
        }

        let pod = ctx.pod_name(group, id);
        if ctx.pods().pod_state(&pod).await?.is_some() {
            return Ok(false);
        }
        ctx.set_member_phase(group, id, MemberPhase::Pending);
        Ok(true)
    }
}
