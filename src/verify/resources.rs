// ABOUTME: Waiting on, updating and removing the deployment resource and secrets.
// ABOUTME: Removal treats an already-missing object as success.

use snafu::ResultExt;

use super::WaitOptions;
use super::error::{
    CheckError, ConflictsExhaustedSnafu, MismatchSnafu, PlatformAccessSnafu, PlatformSnafu,
    ResourceError, StoreAccessSnafu, StoreSnafu, TimeoutSnafu, WaitError,
};
use crate::api::{ArangoDeployment, DeploymentSpec};
use crate::platform::{Secret, SecretOps};
use crate::retry::retry_with;
use crate::store::DeploymentStore;

/// Poll the stored deployment until `predicate` accepts it.
pub async fn wait_until_deployment<P>(
    store: &dyn DeploymentStore,
    predicate: P,
    opts: &WaitOptions,
) -> Result<ArangoDeployment, WaitError>
where
    P: Fn(&ArangoDeployment) -> Result<(), CheckError>,
{
    let predicate = &predicate;
    retry_with(
        &opts.backoff,
        move || async move {
            let current = store.get().await.context(StoreSnafu)?;
            predicate(&current.value)?;
            Ok::<_, CheckError>(current.value)
        },
        opts.timeout,
    )
    .await
    .context(TimeoutSnafu {
        what: "deployment",
    })
}

/// Poll a secret until it exists and `predicate` accepts it.
pub async fn wait_until_secret<P>(
    secrets: &dyn SecretOps,
    name: &str,
    predicate: P,
    opts: &WaitOptions,
) -> Result<Secret, WaitError>
where
    P: Fn(&Secret) -> Result<(), CheckError>,
{
    let predicate = &predicate;
    retry_with(
        &opts.backoff,
        move || async move {
            let secret = secrets.get_secret(name).await.context(PlatformSnafu)?;
            predicate(&secret)?;
            Ok::<_, CheckError>(secret)
        },
        opts.timeout,
    )
    .await
    .context(TimeoutSnafu {
        what: format!("secret {}", name),
    })
}

/// Poll until a secret no longer exists.
pub async fn wait_until_secret_not_found(
    secrets: &dyn SecretOps,
    name: &str,
    opts: &WaitOptions,
) -> Result<(), WaitError> {
    retry_with(
        &opts.backoff,
        move || async move {
            match secrets.get_secret(name).await {
                Ok(_) => MismatchSnafu {
                    message: format!("secret {} still exists", name),
                }
                .fail(),
                Err(e) if e.is_not_found() => Ok(()),
                Err(source) => Err(CheckError::Platform { source }),
            }
        },
        opts.timeout,
    )
    .await
    .context(TimeoutSnafu {
        what: format!("removal of secret {}", name),
    })
}

/// Apply `update` to the stored spec, re-reading and re-applying it when
/// the write conflicts with a concurrent change.
pub async fn update_deployment<F>(
    store: &dyn DeploymentStore,
    mut update: F,
    max_conflicts: u32,
) -> Result<ArangoDeployment, ResourceError>
where
    F: FnMut(&mut DeploymentSpec),
{
    let mut conflicts = 0u32;
    loop {
        let current = store.get().await.context(StoreAccessSnafu)?;
        let mut deployment = current.value;
        update(&mut deployment.spec);

        match store.update_spec(&deployment.spec, current.version).await {
            Ok(_) => return Ok(deployment),
            Err(e) if e.is_conflict() => {
                conflicts += 1;
                if conflicts > max_conflicts {
                    return ConflictsExhaustedSnafu {
                        attempts: conflicts,
                    }
                    .fail();
                }
                tracing::debug!(conflicts, "Spec update conflicted, retrying");
            }
            Err(e) => return Err(e).context(StoreAccessSnafu),
        }
    }
}

pub async fn remove_deployment(store: &dyn DeploymentStore) -> Result<(), ResourceError> {
    match store.delete().await {
        Err(e) if e.is_not_found() => Ok(()),
        other => other.context(StoreAccessSnafu),
    }
}

pub async fn remove_secret(secrets: &dyn SecretOps, name: &str) -> Result<(), ResourceError> {
    match secrets.delete_secret(name).await {
        Err(e) if e.is_not_found() => Ok(()),
        other => other.context(PlatformAccessSnafu),
    }
}
