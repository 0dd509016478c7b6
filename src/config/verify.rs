// ABOUTME: Timeouts and backoff for convergence and resource polling.
// ABOUTME: Defaults suit a freshly scheduled deployment on a busy cluster.

use serde::Deserialize;
use std::time::Duration;

use crate::retry::Backoff;

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyConfig {
    /// How long to wait for a deployment to become healthy.
    #[serde(default = "default_ready_timeout", with = "humantime_serde")]
    pub ready_timeout: Duration,

    #[serde(default = "default_secret_timeout", with = "humantime_serde")]
    pub secret_timeout: Duration,

    #[serde(default)]
    pub backoff: Backoff,
}

fn default_ready_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_secret_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            ready_timeout: default_ready_timeout(),
            secret_timeout: default_secret_timeout(),
            backoff: Backoff::default(),
        }
    }
}
