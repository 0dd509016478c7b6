// ABOUTME: Waiting for a server to answer version requests.
// ABOUTME: Optionally accepts the no-leader answer of a resilient single follower.

use snafu::ResultExt;
use std::cmp::Ordering;

use super::WaitOptions;
use super::error::{CheckError, MismatchSnafu, NoLeaderSnafu, PredicateSnafu, TimeoutSnafu, WaitError};
use crate::client::{DatabaseClient, VersionInfo};
use crate::retry::retry_with;

/// Extra check on the version a server reports.
pub type VersionPredicate = Box<dyn Fn(&VersionInfo) -> Result<(), CheckError> + Send + Sync>;

/// Accepts a server reporting the same version as `expected`.
pub fn equal_versions_predicate(expected: &VersionInfo) -> VersionPredicate {
    let expected = expected.version.clone();
    Box::new(move |actual: &VersionInfo| {
        if expected.compare(&actual.version) == Ordering::Equal {
            return Ok(());
        }
        MismatchSnafu {
            message: format!(
                "given version {} and version from server {} do not match",
                expected, actual.version
            ),
        }
        .fail()
    })
}

pub fn equal_versions_predicate_from_str(version: &str) -> VersionPredicate {
    equal_versions_predicate(&VersionInfo::new(version))
}

/// Poll the version endpoint until the server answers.
///
/// With `allow_no_leader`, a no-leader answer ends the wait as well, but is
/// returned as [`WaitError::NoLeader`] so the caller can tell it apart.
/// `predicate` is checked once, against the first successful answer.
pub async fn wait_until_version_up(
    client: &dyn DatabaseClient,
    predicate: Option<&VersionPredicate>,
    allow_no_leader: bool,
    opts: &WaitOptions,
) -> Result<VersionInfo, WaitError> {
    let answer = retry_with(
        &opts.backoff,
        move || async move {
            match client.version().await {
                Ok(info) => Ok(Ok(info)),
                Err(e) if allow_no_leader && e.is_no_leader() => Ok(Err(e)),
                Err(source) => Err(CheckError::Client { source }),
            }
        },
        opts.timeout,
    )
    .await
    .context(TimeoutSnafu {
        what: "server version",
    })?;

    let info = answer.context(NoLeaderSnafu)?;
    if let Some(predicate) = predicate {
        predicate(&info).context(PredicateSnafu)?;
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_versions_ignore_formatting_of_components() {
        let predicate = equal_versions_predicate_from_str("3.4.2");
        assert!(predicate(&VersionInfo::new("3.4.2")).is_ok());
        assert!(predicate(&VersionInfo::new("3.04.2")).is_ok());
    }

    #[test]
    fn different_versions_are_reported() {
        let predicate = equal_versions_predicate_from_str("3.4.2");
        let err = predicate(&VersionInfo::new("3.3.19")).unwrap_err();
        assert!(err.to_string().contains("3.4.2"));
        assert!(err.to_string().contains("3.3.19"));
    }
}
