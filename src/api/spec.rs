// ABOUTME: Desired state of a deployment: mode, image and per-group counts.
// ABOUTME: Applies mode-dependent default counts for unset groups.

use serde::{Deserialize, Serialize};

use crate::types::{DeploymentMode, ServerGroup};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerGroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl ServerGroupSpec {
    pub fn with_count(count: u32) -> Self {
        Self { count: Some(count) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    #[serde(default)]
    pub mode: DeploymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub single: ServerGroupSpec,
    #[serde(default)]
    pub agents: ServerGroupSpec,
    #[serde(default)]
    pub dbservers: ServerGroupSpec,
    #[serde(default)]
    pub coordinators: ServerGroupSpec,
    #[serde(default)]
    pub syncmasters: ServerGroupSpec,
    #[serde(default)]
    pub syncworkers: ServerGroupSpec,
}

impl DeploymentSpec {
    pub fn new(mode: DeploymentMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn group(&self, group: ServerGroup) -> &ServerGroupSpec {
        match group {
            ServerGroup::Single => &self.single,
            ServerGroup::Agents => &self.agents,
            ServerGroup::DBServers => &self.dbservers,
            ServerGroup::Coordinators => &self.coordinators,
            ServerGroup::SyncMasters => &self.syncmasters,
            ServerGroup::SyncWorkers => &self.syncworkers,
        }
    }

    pub fn group_mut(&mut self, group: ServerGroup) -> &mut ServerGroupSpec {
        match group {
            ServerGroup::Single => &mut self.single,
            ServerGroup::Agents => &mut self.agents,
            ServerGroup::DBServers => &mut self.dbservers,
            ServerGroup::Coordinators => &mut self.coordinators,
            ServerGroup::SyncMasters => &mut self.syncmasters,
            ServerGroup::SyncWorkers => &mut self.syncworkers,
        }
    }

    /// Whether the mode runs servers of the given group at all.
    pub fn uses_group(&self, group: ServerGroup) -> bool {
        match self.mode {
            DeploymentMode::Cluster => !matches!(group, ServerGroup::Single),
            DeploymentMode::Single => matches!(group, ServerGroup::Single),
            DeploymentMode::ResilientSingle => {
                matches!(group, ServerGroup::Single | ServerGroup::Agents)
            }
            DeploymentMode::Unrecognized(_) => false,
        }
    }

    /// Desired number of servers in a group. Unset counts fall back to the
    /// mode default; groups the mode does not use always count zero.
    pub fn count(&self, group: ServerGroup) -> u32 {
        if !self.uses_group(group) {
            return 0;
        }
        if let Some(count) = self.group(group).count {
            return count;
        }
        match (&self.mode, group) {
            (DeploymentMode::Single, ServerGroup::Single) => 1,
            (DeploymentMode::ResilientSingle, ServerGroup::Single) => 2,
            (DeploymentMode::ResilientSingle, ServerGroup::Agents) => 3,
            (
                DeploymentMode::Cluster,
                ServerGroup::Agents | ServerGroup::DBServers | ServerGroup::Coordinators,
            ) => 3,
            _ => 0,
        }
    }
}
