// ABOUTME: The Action capability and the factory mapping plan entries to actions.
// ABOUTME: One implementation per action type, each idempotent across restarts.

mod add_member;
mod clean_out_member;
mod remove_member;
mod rotate_member;
mod shutdown_member;
mod wait_for_member_up;

pub use add_member::AddMemberAction;
pub use clean_out_member::CleanOutMemberAction;
pub use remove_member::RemoveMemberAction;
pub use rotate_member::RotateMemberAction;
pub use shutdown_member::ShutdownMemberAction;
pub use wait_for_member_up::WaitForMemberUpAction;

use async_trait::async_trait;
use tracing::Span;

use super::context::ActionContext;
use super::error::ActionError;
use crate::api::{ActionRecord, ActionType};
use crate::types::{MemberId, ServerGroup};

/// A step of the plan.
///
/// Both calls return `Ok(true)` when the action is complete, `Ok(false)`
/// when it needs more time, and `Err` on failure. Either call may be
/// invoked again after a crash, so each must check the current state
/// before acting.
#[async_trait]
pub trait Action: Send + Sync {
    /// Begin the action. `Ok(true)` means it finished synchronously.
    async fn start(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError>;

    /// Poll a started action.
    async fn check_progress(&self, ctx: &mut ActionContext<'_>) -> Result<bool, ActionError>;
}

/// Build the action for a plan entry.
///
/// # Panics
///
/// Panics on an action type this build does not know. A plan holding one
/// was written by an incompatible plan generator and must not be executed.
pub fn create_action(record: &ActionRecord, span: Span) -> Box<dyn Action> {
    let target = Target::new(record, span);
    match &record.action_type {
        ActionType::AddMember => Box::new(AddMemberAction::new(target)),
        ActionType::RemoveMember => Box::new(RemoveMemberAction::new(target)),
        ActionType::CleanOutMember => Box::new(CleanOutMemberAction::new(target)),
        ActionType::ShutdownMember => Box::new(ShutdownMemberAction::new(target)),
        ActionType::RotateMember => Box::new(RotateMemberAction::new(target)),
        ActionType::WaitForMemberUp => Box::new(WaitForMemberUpAction::new(target)),
        ActionType::Unrecognized(name) => panic!("unknown action type '{}'", name),
    }
}

/// The member an action operates on, plus its logging span.
#[derive(Debug, Clone)]
pub(super) struct Target {
    pub group: ServerGroup,
    pub member_id: MemberId,
    pub span: Span,
}

impl Target {
    fn new(record: &ActionRecord, span: Span) -> Self {
        Self {
            group: record.group,
            member_id: record.member_id.clone(),
            span,
        }
    }

    fn exists(&self, ctx: &ActionContext<'_>) -> bool {
        ctx.member(self.group, &self.member_id).is_some()
    }
}

/// Ask a database member to shut down. Returns false when the request
/// could not be delivered, in which case the caller falls back to
/// deleting the pod.
async fn request_shutdown(ctx: &ActionContext<'_>, target: &Target) -> bool {
    if !target.group.is_database() {
        return false;
    }
    let result = match ctx.member_client(target.group, &target.member_id).await {
        Ok(client) => client.shutdown(false).await.map_err(ActionError::from),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(parent: &target.span, error = %e, "Graceful shutdown failed, deleting pod");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "unknown action type 'ResizeMember'")]
    fn unknown_type_panics() {
        let record = ActionRecord::new(
            "a1",
            ActionType::Unrecognized("ResizeMember".to_string()),
            ServerGroup::DBServers,
            "PRMR-1",
        );
        let _ = create_action(&record, Span::none());
    }

    #[test]
    fn every_known_type_builds() {
        let types = [
            ActionType::AddMember,
            ActionType::RemoveMember,
            ActionType::CleanOutMember,
            ActionType::ShutdownMember,
            ActionType::RotateMember,
            ActionType::WaitForMemberUp,
        ];
        for action_type in types {
            let record = ActionRecord::new("a1", action_type, ServerGroup::Agents, "AGNT-1");
            let _ = create_action(&record, Span::none());
        }
    }
}
