// ABOUTME: Static checks of a stored plan before it is handed to the executor.
// ABOUTME: Collects non-fatal warnings; unknown action types and duplicate ids are errors.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::api::{ActionPhase, ActionType, ArangoDeployment};
use crate::error::{Error, Result};

/// Collects non-fatal findings.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Action targets a member the status does not list.
    MissingMember,
    /// A started action is not at the head of the plan.
    StartedBehindHead,
    /// Started action running longer than its type's expected duration.
    Overdue,
}

/// Check the plan of `deployment`.
///
/// Fails when an entry has an action type this build cannot execute or
/// when two entries share an id.
pub fn check_plan(deployment: &ArangoDeployment, now: DateTime<Utc>) -> Result<Diagnostics> {
    let plan = &deployment.status.plan;
    let mut diag = Diagnostics::default();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, action) in plan.iter().enumerate() {
        if !action.action_type.is_recognized() {
            errors.push(format!("unknown action type '{}' ({})", action.action_type, action.id));
        }
        if !seen.insert(action.id.as_str()) {
            errors.push(format!("duplicate action id {}", action.id));
        }

        let member_known = deployment
            .status
            .members
            .find(action.group, &action.member_id)
            .is_some();
        if action.action_type != ActionType::AddMember && !member_known {
            diag.warn(Warning::new(
                WarningKind::MissingMember,
                format!("{} targets a member that is not in status", action),
            ));
        }

        if action.phase() == ActionPhase::Started {
            if index > 0 {
                diag.warn(Warning::new(
                    WarningKind::StartedBehindHead,
                    format!("{} is started but not at the head of the plan", action),
                ));
            } else if action.is_overdue(now) {
                diag.warn(Warning::new(
                    WarningKind::Overdue,
                    format!("{} is taking longer than expected", action),
                ));
            }
        }
    }

    if !errors.is_empty() {
        return Err(Error::PlanCheck(errors.join("; ")));
    }
    Ok(diag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ActionRecord, DeploymentSpec, MemberStatus};
    use crate::types::{DeploymentMode, ServerGroup};

    fn deployment() -> ArangoDeployment {
        let mut d = ArangoDeployment::new("db", DeploymentSpec::new(DeploymentMode::Cluster));
        d.status.members.dbservers.push(MemberStatus::new("PRMR-1"));
        d
    }

    #[test]
    fn clean_plan_has_no_warnings() {
        let mut d = deployment();
        d.status.plan = vec![
            ActionRecord::new("a1", ActionType::AddMember, ServerGroup::DBServers, "PRMR-2"),
            ActionRecord::new("a2", ActionType::CleanOutMember, ServerGroup::DBServers, "PRMR-1"),
        ];
        let diag = check_plan(&d, Utc::now()).unwrap();
        assert!(!diag.has_warnings());
    }

    #[test]
    fn unknown_type_fails() {
        let mut d = deployment();
        d.status.plan = vec![ActionRecord::new(
            "a1",
            ActionType::Unrecognized("ResizeMember".to_string()),
            ServerGroup::DBServers,
            "PRMR-1",
        )];
        let err = check_plan(&d, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("ResizeMember"));
    }

    #[test]
    fn duplicate_ids_fail() {
        let mut d = deployment();
        d.status.plan = vec![
            ActionRecord::new("a1", ActionType::ShutdownMember, ServerGroup::DBServers, "PRMR-1"),
            ActionRecord::new("a1", ActionType::RotateMember, ServerGroup::DBServers, "PRMR-1"),
        ];
        assert!(check_plan(&d, Utc::now()).is_err());
    }

    #[test]
    fn action_on_missing_member_warns() {
        let mut d = deployment();
        d.status.plan = vec![ActionRecord::new(
            "a1",
            ActionType::RemoveMember,
            ServerGroup::Coordinators,
            "CRDN-9",
        )];
        let diag = check_plan(&d, Utc::now()).unwrap();
        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::MissingMember);
    }

    #[test]
    fn overdue_head_warns() {
        let mut d = deployment();
        let mut action =
            ActionRecord::new("a1", ActionType::ShutdownMember, ServerGroup::DBServers, "PRMR-1");
        action.start_time = Some(Utc::now() - chrono::Duration::hours(2));
        d.status.plan = vec![action];
        let diag = check_plan(&d, Utc::now()).unwrap();
        assert_eq!(diag.warnings()[0].kind, WarningKind::Overdue);
    }
}
