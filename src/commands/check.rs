// ABOUTME: Check command: validates the stored plan without executing it.
// ABOUTME: Unknown action types fail the command; suspicious entries are warnings.

use arangodeploy::config::Config;
use arangodeploy::diagnostics::check_plan;
use arangodeploy::error::Result;
use arangodeploy::output::Output;
use chrono::Utc;

use super::load_deployment;

pub async fn check(config: &Config, output: &Output) -> Result<()> {
    let deployment = load_deployment(config).await?.value;
    let diag = check_plan(&deployment, Utc::now())?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
    output.success(&format!(
        "Plan of {} is valid ({} action(s), {} warning(s))",
        deployment.name(),
        deployment.status.plan.len(),
        diag.warnings().len()
    ));
    Ok(())
}
