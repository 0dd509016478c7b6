// ABOUTME: CleanOutMember: moves all shards off a DB-server before it is removed.
// ABOUTME: Start issues the clean out, CheckProgress waits until the server is empty.

use async_trait::async_trait;

use super::{Action, Target};
use crate::api::MemberPhase;
use crate::reconcile::context::ActionContext;
use crate::reconcile::error::ActionError;
use crate::types::ServerGroup;

pub struct CleanOutMemberAction {
    target: Target,
}

impl CleanOutMemberAction {
    pub(super) fn new(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Action for CleanOutMemberAction {
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        if group != ServerGroup::DBServers {
            tracing::debug!(parent: &self.target.span, "Only DB-servers hold shards, nothing to clean out");
            return Ok(true);
        }
        if !self.target.exists(ctx) {
            return Ok(true);
        }

        let cluster = ctx.cluster().await?;
        if cluster.is_cleaned_out(id.as_str()).await? {
            ctx.set_member_phase(group, id, MemberPhase::CleanedOut);
            return Ok(true);
        }

        cluster.clean_out_server(id.as_str()).await?;
        ctx.set_member_phase(group, id, MemberPhase::CleaningOut);
        tracing::info!(parent: &self.target.span, "Cleaning out {}", id);
        Ok(false)
    }

    async fn check_progress(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError> {
        let (group, id) = (self.target.group, &self.target.member_id);
        if !self.target.exists(ctx) {
            return Ok(true);
        }

        let cluster = ctx.cluster().await?;
        if !cluster.is_cleaned_out(id.as_str()).await? {
            return Ok(false);
        }
        ctx.set_member_phase(group, id, MemberPhase::CleanedOut);
        tracing::info!(parent: &self.target.span, "Cleaned out {}", id);
        Ok(true)
    }
}
