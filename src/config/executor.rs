// ABOUTME: Plan executor settings.
// ABOUTME: Per-call deadline and how often a conflicting status write is retried.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
    /// Deadline for a single Start or CheckProgress call.
    #[serde(default = "default_call_timeout", with = "humantime_serde")]
    pub call_timeout: Duration,

    /// Re-read/reapply attempts after a status write loses a race.
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

fn default_call_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_conflict_retries() -> u32 {
    5
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            call_timeout: default_call_timeout(),
            conflict_retries: default_conflict_retries(),
        }
    }
}
