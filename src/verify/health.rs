// ABOUTME: Cluster health checks against the desired deployment spec.
// ABOUTME: Counts agents and good DB-servers and coordinators in a health report.

use snafu::ResultExt;

use super::WaitOptions;
use super::error::{CheckError, ClientSnafu, MismatchSnafu, TimeoutSnafu, WaitError};
use crate::api::DeploymentSpec;
use crate::client::{ClusterHealth, DatabaseClient, ServerRole, ServerStatus};
use crate::retry::retry_with;
use crate::types::ServerGroup;

/// Succeeds when the report holds as many agents, good DB-servers and good
/// coordinators as the spec asks for.
///
/// Agents count regardless of status.
pub fn cluster_health_equals_spec(
    health: &ClusterHealth,
    spec: &DeploymentSpec,
) -> Result<(), CheckError> {
    let (mut agents, mut dbservers, mut coordinators) = (0usize, 0usize, 0usize);
    for server in health.health.values() {
        match (server.role, server.status) {
            (ServerRole::Agent, _) => agents += 1,
            (ServerRole::DBServer, ServerStatus::Good) => dbservers += 1,
            (ServerRole::Coordinator, ServerStatus::Good) => coordinators += 1,
            _ => {}
        }
    }

    let expected = (
        spec.count(ServerGroup::Agents) as usize,
        spec.count(ServerGroup::DBServers) as usize,
        spec.count(ServerGroup::Coordinators) as usize,
    );
    if expected == (agents, dbservers, coordinators) {
        return Ok(());
    }
    MismatchSnafu {
        message: format!(
            "expected {},{},{} got {},{},{}",
            expected.0, expected.1, expected.2, agents, dbservers, coordinators
        ),
    }
    .fail()
}

/// Poll cluster health until `predicate` accepts a report.
pub async fn wait_until_cluster_health<P>(
    client: &dyn DatabaseClient,
    predicate: P,
    opts: &WaitOptions,
) -> Result<ClusterHealth, WaitError>
where
    P: Fn(&ClusterHealth) -> Result<(), CheckError>,
{
    let predicate = &predicate;
    retry_with(
        &opts.backoff,
        move || async move {
            let cluster = client.cluster().await.context(ClientSnafu)?;
            let health = cluster.health().await.context(ClientSnafu)?;
            predicate(&health)?;
            Ok::<_, CheckError>(health)
        },
        opts.timeout,
    )
    .await
    .context(TimeoutSnafu {
        what: "cluster health",
    })
}
