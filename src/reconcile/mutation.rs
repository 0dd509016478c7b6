// ABOUTME: Pure, idempotent status changes recorded while an action runs.
// ABOUTME: Replayed on top of a fresh read when a status write conflicts.

use chrono::{DateTime, Utc};

use crate::api::{DeploymentStatus, MemberPhase, MemberStatus};
use crate::types::{ActionId, MemberId, ServerGroup};

#[derive(Debug, Clone, PartialEq)]
pub enum StatusMutation {
    AddMember {
        group: ServerGroup,
        member: MemberStatus,
    },
    RemoveMember {
        group: ServerGroup,
        id: MemberId,
    },
    SetMemberPhase {
        group: ServerGroup,
        id: MemberId,
        phase: MemberPhase,
    },
    /// Remove a finished action from the plan.
    PopAction { id: ActionId },
    /// Record when an action's Start completed.
    StampStart { id: ActionId, at: DateTime<Utc> },
}

impl StatusMutation {
    /// Apply to a status. Applying twice has the same effect as once, and
    /// a change whose target no longer exists is a no-op.
    pub fn apply(&self, status: &mut DeploymentStatus) {
        match self {
            StatusMutation::AddMember { group, member } => {
                let members = status.members.for_group_mut(*group);
                if !members.iter().any(|m| m.id == member.id) {
                    members.push(member.clone());
                }
            }
            StatusMutation::RemoveMember { group, id } => {
                status.members.for_group_mut(*group).retain(|m| &m.id != id);
            }
            StatusMutation::SetMemberPhase { group, id, phase } => {
                if let Some(member) = status.members.find_mut(*group, id) {
                    member.phase = *phase;
                }
            }
            StatusMutation::PopAction { id } => {
                if let Some(index) = status.plan.iter().position(|a| &a.id == id) {
                    status.plan.remove(index);
                }
            }
            StatusMutation::StampStart { id, at } => {
                if let Some(action) = status.plan.iter_mut().find(|a| &a.id == id)
                    && action.start_time.is_none()
                {
                    action.start_time = Some(*at);
                }
            }
        }
    }
}
