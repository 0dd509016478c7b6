// ABOUTME: The managed deployment resource: metadata, spec and status.
// ABOUTME: Also derives the pod names the orchestration platform uses for members.

use serde::{Deserialize, Serialize};

use super::spec::DeploymentSpec;
use super::status::DeploymentStatus;
use crate::types::{MemberId, ServerGroup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArangoDeployment {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DeploymentSpec,
    #[serde(default)]
    pub status: DeploymentStatus,
}

impl ArangoDeployment {
    pub fn new(name: impl Into<String>, spec: DeploymentSpec) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: default_namespace(),
            },
            spec,
            status: DeploymentStatus::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    /// Name of the pod running a member. Uses the name recorded in status
    /// when present, otherwise `<deployment>-<role>-<id>` in lowercase.
    pub fn pod_name(&self, group: ServerGroup, member_id: &MemberId) -> String {
        self.status
            .members
            .find(group, member_id)
            .and_then(|m| m.pod_name.clone())
            .unwrap_or_else(|| {
                format!("{}-{}-{}", self.name(), group.as_role(), member_id).to_lowercase()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemberStatus;
    use crate::types::DeploymentMode;

    #[test]
    fn pod_name_is_derived_from_role_and_id() {
        let d = ArangoDeployment::new("db", DeploymentSpec::new(DeploymentMode::Cluster));
        assert_eq!(
            d.pod_name(ServerGroup::DBServers, &MemberId::new("PRMR-X1")),
            "db-dbserver-prmr-x1"
        );
    }

    #[test]
    fn recorded_pod_name_wins() {
        let mut d = ArangoDeployment::new("db", DeploymentSpec::new(DeploymentMode::Cluster));
        let mut member = MemberStatus::new("AGNT-1");
        member.pod_name = Some("custom-pod".to_string());
        d.status.members.agents.push(member);
        assert_eq!(
            d.pod_name(ServerGroup::Agents, &MemberId::new("AGNT-1")),
            "custom-pod"
        );
    }

    #[test]
    fn namespace_defaults_when_missing() {
        let d: ArangoDeployment = serde_yaml::from_str("metadata:\n  name: db\n").unwrap();
        assert_eq!(d.namespace(), "default");
        assert_eq!(d.spec.mode, DeploymentMode::Cluster);
    }
}
