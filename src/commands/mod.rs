// ABOUTME: Command module aggregator for the arangodeploy CLI.
// ABOUTME: Re-exports the status, check and verify command handlers.

mod check;
mod status;
mod verify;

pub use check::check;
pub use status::status;
pub use verify::verify;

use arangodeploy::api::ArangoDeployment;
use arangodeploy::config::Config;
use arangodeploy::error::Result;
use arangodeploy::store::{DeploymentStore, FileStatusStore, Versioned};

/// Read the deployment resource the config points at.
async fn load_deployment(config: &Config) -> Result<Versioned<ArangoDeployment>> {
    let store = FileStatusStore::open(config.resource_path())?;
    Ok(store.get().await?)
}
