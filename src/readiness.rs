//! Bounded readiness probe
//!
//! Detecting that a third-party widget has finished loading is a polling
//! problem. Instead of an uncancelled interval, the probe here is a plain
//! future: bounded attempts, exponential backoff with a cap, and a hard
//! overall timeout. Dropping the future cancels the probe.

use std::future::Future;
use std::time::Duration;

use tokio::time;
use tracing::debug;

/// Probe timing parameters.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Delay before the second attempt; doubles per attempt afterwards
    pub initial_delay: Duration,
    /// Backoff ceiling
    pub max_delay: Duration,
    /// Hard limit on total probe time
    pub timeout: Duration,
    /// Maximum number of check attempts
    pub max_attempts: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
            max_attempts: 50,
        }
    }
}

/// Probe failure reasons.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("readiness check did not pass within {0:?}")]
    TimedOut(Duration),

    #[error("readiness check did not pass after {0} attempts")]
    Exhausted(u32),
}

/// Poll `check` until it returns true, with backoff and a hard timeout.
///
/// Returns the attempt number that succeeded. The future is cancellable by
/// dropping it (e.g. inside `tokio::select!`).
pub async fn wait_until_ready<C, Fut>(config: ProbeConfig, mut check: C) -> Result<u32, ProbeError>
where
    C: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let attempts = async {
        let mut delay = config.initial_delay;

        for attempt in 1..=config.max_attempts {
            if check().await {
                debug!("Readiness check passed on attempt {}", attempt);
                return Ok(attempt);
            }

            if attempt < config.max_attempts {
                time::sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
            }
        }

        Err(ProbeError::Exhausted(config.max_attempts))
    };

    match time::timeout(config.timeout, attempts).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::TimedOut(config.timeout)),
    }
}
