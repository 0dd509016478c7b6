// ABOUTME: Server groups of a deployment (single, agents, dbservers, ...).
// ABOUTME: Maps each group to the role name used in member naming and logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A group of servers sharing one role within a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerGroup {
    Single,
    Agents,
    #[serde(rename = "dbservers")]
    DBServers,
    Coordinators,
    #[serde(rename = "syncmasters")]
    SyncMasters,
    #[serde(rename = "syncworkers")]
    SyncWorkers,
}

impl ServerGroup {
    /// All groups in the order members are listed.
    pub const ALL: [ServerGroup; 6] = [
        ServerGroup::Single,
        ServerGroup::Agents,
        ServerGroup::DBServers,
        ServerGroup::Coordinators,
        ServerGroup::SyncMasters,
        ServerGroup::SyncWorkers,
    ];

    /// Role name of servers in this group.
    pub fn as_role(&self) -> &'static str {
        match self {
            ServerGroup::Single => "single",
            ServerGroup::Agents => "agent",
            ServerGroup::DBServers => "dbserver",
            ServerGroup::Coordinators => "coordinator",
            ServerGroup::SyncMasters => "syncmaster",
            ServerGroup::SyncWorkers => "syncworker",
        }
    }

    /// Whether servers in this group run an arangod process with the
    /// database HTTP API (as opposed to arangosync).
    pub fn is_database(&self) -> bool {
        !matches!(self, ServerGroup::SyncMasters | ServerGroup::SyncWorkers)
    }
}

impl fmt::Display for ServerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_role())
    }
}
