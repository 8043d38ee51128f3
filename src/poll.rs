//! Bounded polling for resources that are provisioned asynchronously.
//!
//! A lookup that fails with HTTP 404 is treated as "not ready yet" and is
//! tried again after a fixed delay, until the attempt budget is spent. Any
//! other failure ends the poll immediately.

use anyhow::{Result, bail};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use crate::http::is_not_found;

/// Default number of lookups per poll, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay between two lookups, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Attempt budget and delay for one polling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            bail!("Polling needs at least one attempt");
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

/// Terminal failure of a polling operation.
#[derive(Debug)]
pub enum PollError {
    /// Every attempt reported the resource as not ready.
    Exhausted,
    /// A failure other than "not ready", forwarded unchanged.
    Other(anyhow::Error),
}

impl std::fmt::Display for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollError::Exhausted => write!(f, "Resource did not become available"),
            PollError::Other(_) => write!(f, "Lookup failed"),
        }
    }
}

impl std::error::Error for PollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PollError::Exhausted => None,
            PollError::Other(e) => Some(&**e),
        }
    }
}

/// Calls `lookup` with `request` until it succeeds, fails with something
/// other than a 404, or the policy's attempt budget runs out.
///
/// The budget is decremented before it is checked, so with `max_attempts = 1`
/// a single 404 ends the poll without any delay.
pub async fn fetch_with_retry<K, T, F, Fut>(
    request: K,
    policy: &PollPolicy,
    lookup: F,
) -> Result<T, PollError>
where
    K: Clone + std::fmt::Debug,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut remaining = policy.max_attempts;

    loop {
        let attempt = policy.max_attempts - remaining + 1;

        match lookup(request.clone()).await {
            Ok(payload) => {
                debug!("{:?} ready after {} attempt(s)", request, attempt);
                return Ok(payload);
            }
            Err(err) if !is_not_found(&err) => {
                debug!("{:?}: attempt {} failed: {}", request, attempt, err);
                return Err(PollError::Other(err));
            }
            Err(_) => {
                remaining -= 1;
                if remaining == 0 {
                    warn!(
                        "{:?} still not available after {} attempt(s)",
                        request, policy.max_attempts
                    );
                    return Err(PollError::Exhausted);
                }

                debug!(
                    "{:?} not ready (attempt {}/{}), retrying in {}ms...",
                    request,
                    attempt,
                    policy.max_attempts,
                    policy.delay.as_millis()
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
