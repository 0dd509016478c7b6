// ABOUTME: Mode-aware check that a deployment reached its healthy shape.
// ABOUTME: Cluster health, single server version, or the resilient leader/follower pair.

use snafu::{ResultExt, ensure};

use super::WaitOptions;
use super::error::{
    ClusterHealthSnafu, ConnectSnafu, ConvergenceError, LeaderResultsSnafu, MemberCountSnafu,
    MemberVersionSnafu, SingleServerSnafu, UnsupportedModeSnafu,
};
use super::health::{cluster_health_equals_spec, wait_until_cluster_health};
use super::version::wait_until_version_up;
use crate::api::ArangoDeployment;
use crate::client::{ConnectionFactory, DatabaseClient};
use crate::types::{DeploymentMode, ServerGroup};

/// Single servers in a resilient single deployment: one leader, one follower.
pub const RESILIENT_SINGLE_SERVERS: usize = 2;
pub const RESILIENT_SINGLE_AGENTS: usize = 3;

/// Wait until the deployment is healthy for its mode.
///
/// `client` talks to the deployment as a whole; `connections` opens
/// member-scoped clients for the resilient single checks.
pub async fn wait_until_deployment_healthy(
    deployment: &ArangoDeployment,
    client: &dyn DatabaseClient,
    connections: &dyn ConnectionFactory,
    opts: &WaitOptions,
) -> Result<(), ConvergenceError> {
    match &deployment.spec.mode {
        DeploymentMode::Cluster => {
            let spec = &deployment.spec;
            wait_until_cluster_health(client, |h| cluster_health_equals_spec(h, spec), opts)
                .await
                .context(ClusterHealthSnafu)?;
        }
        DeploymentMode::Single => {
            wait_until_version_up(client, None, false, opts)
                .await
                .context(SingleServerSnafu)?;
        }
        DeploymentMode::ResilientSingle => {
            wait_until_version_up(client, None, false, opts)
                .await
                .context(SingleServerSnafu)?;
            resilient_pair_converged(deployment, connections, opts).await?;
        }
        DeploymentMode::Unrecognized(mode) => {
            return UnsupportedModeSnafu { mode: mode.clone() }.fail();
        }
    }
    tracing::debug!(deployment = deployment.name(), "Deployment is healthy");
    Ok(())
}

async fn resilient_pair_converged(
    deployment: &ArangoDeployment,
    connections: &dyn ConnectionFactory,
    opts: &WaitOptions,
) -> Result<(), ConvergenceError> {
    let members = &deployment.status.members;
    let singles = members.for_group(ServerGroup::Single);
    let agents = members.for_group(ServerGroup::Agents);
    ensure!(
        singles.len() == RESILIENT_SINGLE_SERVERS && agents.len() == RESILIENT_SINGLE_AGENTS,
        MemberCountSnafu {
            singles: singles.len(),
            agents: agents.len(),
        }
    );

    for agent in agents {
        let client = connections
            .member_client(deployment, ServerGroup::Agents, &agent.id)
            .await
            .context(ConnectSnafu {
                member: agent.id.clone(),
            })?;
        wait_until_version_up(client.as_ref(), None, false, opts)
            .await
            .context(MemberVersionSnafu {
                member: agent.id.clone(),
            })?;
    }

    let (mut good, mut no_leader) = (0usize, 0usize);
    for single in singles {
        let client = connections
            .member_client(deployment, ServerGroup::Single, &single.id)
            .await
            .context(ConnectSnafu {
                member: single.id.clone(),
            })?;
        match wait_until_version_up(client.as_ref(), None, true, opts).await {
            Ok(_) => good += 1,
            Err(e) if e.is_no_leader() => no_leader += 1,
            Err(e) => {
                return Err(e).context(MemberVersionSnafu {
                    member: single.id.clone(),
                });
            }
        }
    }

    ensure!(good >= 1 && no_leader <= 1, LeaderResultsSnafu { good, no_leader });
    Ok(())
}
