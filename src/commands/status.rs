// ABOUTME: Status command: lists members per group and the pending plan.
// ABOUTME: Each plan entry is shown with its phase (pending or started).

use arangodeploy::api::ActionPhase;
use arangodeploy::config::Config;
use arangodeploy::error::Result;
use arangodeploy::output::Output;
use arangodeploy::types::ServerGroup;
use serde::Serialize;

use super::load_deployment;

#[derive(Serialize)]
struct MemberRow<'a> {
    group: &'static str,
    id: &'a str,
    phase: String,
}

#[derive(Serialize)]
struct ActionRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    action_type: &'a str,
    group: &'static str,
    member: &'a str,
    phase: String,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    name: &'a str,
    namespace: &'a str,
    mode: &'a str,
    version: u64,
    members: Vec<MemberRow<'a>>,
    plan: Vec<ActionRow<'a>>,
}

pub async fn status(config: &Config, output: &Output) -> Result<()> {
    let current = load_deployment(config).await?;
    let deployment = &current.value;

    let members: Vec<MemberRow> = deployment
        .status
        .members
        .iter()
        .map(|(group, m)| MemberRow {
            group: group.as_role(),
            id: m.id.as_str(),
            phase: format!("{:?}", m.phase),
        })
        .collect();
    let plan: Vec<ActionRow> = deployment
        .status
        .plan
        .iter()
        .map(|a| ActionRow {
            id: a.id.as_str(),
            action_type: a.action_type.as_str(),
            group: a.group.as_role(),
            member: a.member_id.as_str(),
            phase: a.phase().to_string(),
        })
        .collect();

    output.progress(&format!(
        "Deployment: {} (namespace {})",
        deployment.name(),
        deployment.namespace()
    ));
    output.progress(&format!("Mode: {}", deployment.spec.mode));
    for group in ServerGroup::ALL {
        let ids: Vec<&str> = members
            .iter()
            .filter(|m| m.group == group.as_role())
            .map(|m| m.id)
            .collect();
        if !ids.is_empty() || deployment.spec.count(group) > 0 {
            output.progress(&format!(
                "  {}: {}/{} [{}]",
                group,
                ids.len(),
                deployment.spec.count(group),
                ids.join(", ")
            ));
        }
    }
    if plan.is_empty() {
        output.progress("Plan: empty");
    } else {
        output.progress(&format!("Plan: {} action(s)", plan.len()));
        for (row, action) in plan.iter().zip(&deployment.status.plan) {
            let marker = if action.phase() == ActionPhase::Started {
                "*"
            } else {
                " "
            };
            output.progress(&format!("  {} {} [{}]", marker, action, row.phase));
        }
    }

    output.data(
        "status",
        &StatusReport {
            name: deployment.name(),
            namespace: deployment.namespace(),
            mode: deployment.spec.mode.as_str(),
            version: current.version.0,
            members,
            plan,
        },
    );
    output.success(&format!(
        "{}: {} member(s), {} planned action(s)",
        deployment.name(),
        deployment.status.members.iter().count(),
        deployment.status.plan.len()
    ));
    Ok(())
}
