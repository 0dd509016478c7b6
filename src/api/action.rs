// ABOUTME: Plan action records stored in the deployment status.
// ABOUTME: Closed set of action types plus a carrier for unknown persisted types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::types::{ActionId, MemberId, ServerGroup};

/// Ordered queue of actions; the head is the only entry ever in flight.
pub type Plan = Vec<ActionRecord>;

/// Lifecycle operation performed by a plan action.
///
/// The set is closed. A value the executor does not know (written by a
/// newer plan generator) is kept as `Unrecognized` so it is not silently
/// dropped when the status is read and written back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    AddMember,
    RemoveMember,
    CleanOutMember,
    ShutdownMember,
    RotateMember,
    WaitForMemberUp,
    Unrecognized(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::AddMember => "AddMember",
            ActionType::RemoveMember => "RemoveMember",
            ActionType::CleanOutMember => "CleanOutMember",
            ActionType::ShutdownMember => "ShutdownMember",
            ActionType::RotateMember => "RotateMember",
            ActionType::WaitForMemberUp => "WaitForMemberUp",
            ActionType::Unrecognized(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ActionType::Unrecognized(_))
    }

    /// How long a started action of this type is expected to take before
    /// it is reported as overdue.
    pub fn expected_duration(&self) -> Option<Duration> {
        const MINUTE: u64 = 60;
        let secs = match self {
            ActionType::AddMember => 10 * MINUTE,
            ActionType::RemoveMember => 15 * MINUTE,
            ActionType::CleanOutMember => 48 * 60 * MINUTE,
            ActionType::ShutdownMember => 30 * MINUTE,
            ActionType::RotateMember => 15 * MINUTE,
            ActionType::WaitForMemberUp => 30 * MINUTE,
            ActionType::Unrecognized(_) => return None,
        };
        Some(Duration::from_secs(secs))
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "AddMember" => ActionType::AddMember,
            "RemoveMember" => ActionType::RemoveMember,
            "CleanOutMember" => ActionType::CleanOutMember,
            "ShutdownMember" => ActionType::ShutdownMember,
            "RotateMember" => ActionType::RotateMember,
            "WaitForMemberUp" => ActionType::WaitForMemberUp,
            _ => ActionType::Unrecognized(value),
        }
    }
}

impl From<ActionType> for String {
    fn from(action_type: ActionType) -> Self {
        match action_type {
            ActionType::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution phase of a plan entry, derived from its start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    /// Start has not completed yet.
    Pending,
    /// Start completed; waiting for CheckProgress to report ready.
    Started,
}

impl fmt::Display for ActionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionPhase::Pending => f.write_str("pending"),
            ActionPhase::Started => f.write_str("started"),
        }
    }
}

/// One entry of the plan, created by the plan generator.
///
/// Everything except `start_time` is fixed at creation. `start_time` moves
/// once from unset to set, after which the entry is only ever removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub id: ActionId,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub group: ServerGroup,
    #[serde(rename = "memberID")]
    pub member_id: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

impl ActionRecord {
    pub fn new(
        id: impl Into<ActionId>,
        action_type: ActionType,
        group: ServerGroup,
        member_id: impl Into<MemberId>,
    ) -> Self {
        Self {
            id: id.into(),
            action_type,
            group,
            member_id: member_id.into(),
            creation_time: Some(Utc::now()),
            start_time: None,
        }
    }

    pub fn phase(&self) -> ActionPhase {
        if self.start_time.is_some() {
            ActionPhase::Started
        } else {
            ActionPhase::Pending
        }
    }

    /// Whether a started action has been running longer than its type is
    /// expected to take.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match (self.start_time, self.action_type.expected_duration()) {
            (Some(started), Some(expected)) => (now - started)
                .to_std()
                .map(|elapsed| elapsed > expected)
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} {})",
            self.action_type,
            self.id,
            self.group.as_role(),
            self.member_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_yaml_uses_camel_case_and_type_key() {
        let yaml = r#"
id: a1
type: CleanOutMember
group: dbservers
memberID: PRMR-1
"#;
        let record: ActionRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.action_type, ActionType::CleanOutMember);
        assert_eq!(record.group, ServerGroup::DBServers);
        assert_eq!(record.member_id.as_str(), "PRMR-1");
        assert_eq!(record.phase(), ActionPhase::Pending);
    }

    #[test]
    fn unknown_type_survives_round_trip() {
        let yaml = "id: a1\ntype: UpgradeMember\ngroup: agents\nmemberID: AGNT-1\n";
        let record: ActionRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            record.action_type,
            ActionType::Unrecognized("UpgradeMember".to_string())
        );
        let out = serde_yaml::to_string(&record).unwrap();
        assert!(out.contains("type: UpgradeMember"));
    }

    #[test]
    fn started_action_past_expected_duration_is_overdue() {
        let mut record = ActionRecord::new("a1", ActionType::AddMember, ServerGroup::Agents, "m");
        let now = Utc::now();
        assert!(!record.is_overdue(now));

        record.start_time = Some(now - chrono::Duration::minutes(11));
        assert!(record.is_overdue(now));

        record.start_time = Some(now - chrono::Duration::minutes(1));
        assert!(!record.is_overdue(now));
    }
}
