// ABOUTME: Bounded-time polling of an arbitrary fallible operation.
// ABOUTME: Retries with capped exponential backoff until success or timeout.

use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Delay schedule between poll attempts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Backoff {
    #[serde(default = "default_initial", with = "humantime_serde")]
    pub initial: Duration,

    #[serde(default = "default_max", with = "humantime_serde")]
    pub max: Duration,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_initial() -> Duration {
    Duration::from_millis(250)
}

fn default_max() -> Duration {
    Duration::from_secs(5)
}

fn default_multiplier() -> f64 {
    1.5
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            max: default_max(),
            multiplier: default_multiplier(),
        }
    }
}

impl Backoff {
    /// Fixed interval between attempts.
    pub fn constant(interval: Duration) -> Self {
        Self {
            initial: interval,
            max: interval,
            multiplier: 1.0,
        }
    }

    fn next(&self, current: Duration) -> Duration {
        if current >= self.max {
            return self.max;
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier.max(1.0))
            .map_or(self.max, |next| next.min(self.max))
    }
}

/// The operation did not succeed within the allotted time.
#[derive(Debug, thiserror::Error)]
#[error("operation did not succeed within {timeout:?} ({attempts} attempts): {source}")]
pub struct RetryError<E: std::error::Error + 'static> {
    pub timeout: Duration,
    pub attempts: u32,
    pub elapsed: Duration,
    /// Error returned by the last attempt.
    #[source]
    pub source: E,
}

impl<E: std::error::Error + 'static> RetryError<E> {
    pub fn into_last_error(self) -> E {
        self.source
    }

    pub fn last_error(&self) -> &E {
        &self.source
    }
}

/// Poll `op` with the default backoff until it succeeds or `timeout` elapses.
pub async fn retry<T, E, F, Fut>(op: F, timeout: Duration) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with(&Backoff::default(), op, timeout).await
}

/// Poll `op` until it returns `Ok` or `timeout` elapses.
///
/// The first attempt is made immediately. Sleeps never extend past the
/// deadline, so a never-succeeding operation fails at most one attempt's
/// latency after `timeout`.
pub async fn retry_with<T, E, F, Fut>(
    backoff: &Backoff,
    mut op: F,
    timeout: Duration,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let mut delay = backoff.initial;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(RetryError {
                timeout,
                attempts,
                elapsed,
                source: err,
            });
        }

        tracing::trace!(attempts, error = %err, "operation not ready, retrying");
        tokio::time::sleep(delay.min(timeout - elapsed)).await;
        delay = backoff.next(delay);
    }
}
