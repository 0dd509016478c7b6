// ABOUTME: Bounded polling helpers for checking a deployment from the outside.
// ABOUTME: Health, version and convergence checks plus resource waits; never used inside a tick.

mod convergence;
mod error;
mod health;
mod resources;
mod version;

pub use convergence::{RESILIENT_SINGLE_AGENTS, RESILIENT_SINGLE_SERVERS, wait_until_deployment_healthy};
pub use error::{CheckError, ConvergenceError, ResourceError, WaitError};
pub use health::{cluster_health_equals_spec, wait_until_cluster_health};
pub use resources::{
    remove_deployment, remove_secret, update_deployment, wait_until_deployment, wait_until_secret,
    wait_until_secret_not_found,
};
pub use version::{
    VersionPredicate, equal_versions_predicate, equal_versions_predicate_from_str,
    wait_until_version_up,
};

use std::time::Duration;

use crate::config::VerifyConfig;
use crate::retry::Backoff;

/// How long a wait may take and how often it polls.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub backoff: Backoff,
}

impl WaitOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            backoff: Backoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Options for deployment readiness checks.
    pub fn ready(config: &VerifyConfig) -> Self {
        Self::new(config.ready_timeout).with_backoff(config.backoff.clone())
    }

    /// Options for secret waits.
    pub fn secrets(config: &VerifyConfig) -> Self {
        Self::new(config.secret_timeout).with_backoff(config.backoff.clone())
    }
}
