// ABOUTME: Cluster health report as returned by /_admin/cluster/health.
// ABOUTME: Per-server role and status keyed by server ID.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerRole {
    Agent,
    #[serde(rename = "DBServer")]
    DBServer,
    Coordinator,
    Single,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerStatus {
    Good,
    Bad,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerHealth {
    pub role: ServerRole,
    pub status: ServerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl ServerHealth {
    pub fn new(role: ServerRole, status: ServerStatus) -> Self {
        Self {
            role,
            status,
            endpoint: None,
            short_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterHealth {
    #[serde(rename = "ClusterId", default)]
    pub cluster_id: String,
    #[serde(rename = "Health", default)]
    pub health: HashMap<String, ServerHealth>,
}

impl ClusterHealth {
    pub fn server(&self, id: &str) -> Option<&ServerHealth> {
        self.health.get(id)
    }
}
