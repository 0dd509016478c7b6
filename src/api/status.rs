// ABOUTME: Observed state of a deployment: members per group and the plan.
// ABOUTME: Only the plan executor mutates this between plan generations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::Plan;
use crate::types::{MemberId, ServerGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemberPhase {
    /// Known to the deployment but no pod created yet.
    #[default]
    Pending,
    Created,
    CleaningOut,
    CleanedOut,
    ShuttingDown,
    Rotating,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatus {
    pub id: MemberId,
    #[serde(default)]
    pub phase: MemberPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvc_name: Option<String>,
}

impl MemberStatus {
    pub fn new(id: impl Into<MemberId>) -> Self {
        Self {
            id: id.into(),
            phase: MemberPhase::Pending,
            created_at: Some(Utc::now()),
            pod_name: None,
            pvc_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentMembers {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub single: Vec<MemberStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<MemberStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dbservers: Vec<MemberStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinators: Vec<MemberStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub syncmasters: Vec<MemberStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub syncworkers: Vec<MemberStatus>,
}

impl DeploymentMembers {
    pub fn for_group(&self, group: ServerGroup) -> &[MemberStatus] {
        match group {
            ServerGroup::Single => &self.single,
            ServerGroup::Agents => &self.agents,
            ServerGroup::DBServers => &self.dbservers,
            ServerGroup::Coordinators => &self.coordinators,
            ServerGroup::SyncMasters => &self.syncmasters,
            ServerGroup::SyncWorkers => &self.syncworkers,
        }
    }

    pub fn for_group_mut(&mut self, group: ServerGroup) -> &mut Vec<MemberStatus> {
        match group {
            ServerGroup::Single => &mut self.single,
            ServerGroup::Agents => &mut self.agents,
            ServerGroup::DBServers => &mut self.dbservers,
            ServerGroup::Coordinators => &mut self.coordinators,
            ServerGroup::SyncMasters => &mut self.syncmasters,
            ServerGroup::SyncWorkers => &mut self.syncworkers,
        }
    }

    pub fn find(&self, group: ServerGroup, id: &MemberId) -> Option<&MemberStatus> {
        self.for_group(group).iter().find(|m| &m.id == id)
    }

    pub fn find_mut(&mut self, group: ServerGroup, id: &MemberId) -> Option<&mut MemberStatus> {
        self.for_group_mut(group).iter_mut().find(|m| &m.id == id)
    }

    /// All members with their group, in group order.
    pub fn iter(&self) -> impl Iterator<Item = (ServerGroup, &MemberStatus)> {
        ServerGroup::ALL
            .into_iter()
            .flat_map(move |group| self.for_group(group).iter().map(move |m| (group, m)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    #[serde(default)]
    pub members: DeploymentMembers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plan: Plan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_looks_only_in_the_given_group() {
        let mut members = DeploymentMembers::default();
        members.agents.push(MemberStatus::new("AGNT-1"));

        let id = MemberId::new("AGNT-1");
        assert!(members.find(ServerGroup::Agents, &id).is_some());
        assert!(members.find(ServerGroup::DBServers, &id).is_none());
    }

    #[test]
    fn iter_walks_groups_in_order() {
        let mut members = DeploymentMembers::default();
        members.coordinators.push(MemberStatus::new("CRDN-1"));
        members.agents.push(MemberStatus::new("AGNT-1"));

        let groups: Vec<_> = members.iter().map(|(g, _)| g).collect();
        assert_eq!(groups, vec![ServerGroup::Agents, ServerGroup::Coordinators]);
    }

    #[test]
    fn empty_status_parses_from_empty_mapping() {
        let status: DeploymentStatus = serde_yaml::from_str("{}").unwrap();
        assert!(status.plan.is_empty());
        assert!(status.members.iter().next().is_none());
    }
}
