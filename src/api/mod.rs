// ABOUTME: Declarative resource model for a managed ArangoDB deployment.
// ABOUTME: Spec (desired state), status (members + plan) and plan action records.

mod action;
mod resource;
mod spec;
mod status;

pub use action::{ActionPhase, ActionRecord, ActionType, Plan};
pub use resource::{ArangoDeployment, ObjectMeta};
pub use spec::{DeploymentSpec, ServerGroupSpec};
pub use status::{DeploymentMembers, DeploymentStatus, MemberPhase, MemberStatus};
