// ABOUTME: AddMember: registers a new member in the deployment status.
// ABOUTME: Completes in Start; the member's pod is created by the pod reconciler.

use async_trait::async_trait;

use super::{Action, Target};
use crate::api::MemberStatus;
use crate::reconcile::context::ActionContext;
use crate::reconcile::error::ActionError;
use crate::reconcile::mutation::StatusMutation;

pub struct AddMemberAction {
    target: Target,
}

impl AddMemberAction {
    pub(super) fn new(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Action for AddMemberAction {
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        if self.target.exists(ctx) {
            tracing::debug!(parent: &self.target.span, "Member already registered");
            return Ok(true);
        }
        ctx.apply(StatusMutation::AddMember {
            group: self.target.group,
            member: MemberStatus::new(self.target.member_id.clone()),
        });
        tracing::info!(parent: &self.target.span, "Added member {}", self.target.member_id);
        Ok(true)
    }

    async fn check_progress(&self, _ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        Ok(true)
    }
}
