// ABOUTME: Verify command: waits for the live deployment to converge.
// ABOUTME: Talks to the database through the configured endpoint templates.

use arangodeploy::client::{ConnectionFactory, EndpointConnectionFactory};
use arangodeploy::config::Config;
use arangodeploy::error::Result;
use arangodeploy::output::Output;
use arangodeploy::verify::{WaitOptions, wait_until_deployment_healthy};
use std::time::Duration;

use super::load_deployment;

pub async fn verify(config: &Config, timeout: Option<Duration>, output: &Output) -> Result<()> {
    let deployment = load_deployment(config).await?.value;
    let connections = EndpointConnectionFactory::from_config(&config.endpoints)?;

    let mut opts = WaitOptions::ready(&config.verify);
    if let Some(timeout) = timeout {
        opts.timeout = timeout;
    }

    output.progress(&format!(
        "Waiting up to {:?} for {} ({}) via {}",
        opts.timeout,
        deployment.name(),
        deployment.spec.mode,
        connections.cluster_endpoint(&deployment)
    ));

    let client = connections.deployment_client(&deployment).await?;
    wait_until_deployment_healthy(&deployment, client.as_ref(), &connections, &opts).await?;

    output.success(&format!("Deployment {} is healthy", deployment.name()));
    Ok(())
}
