//! Bounded write retry with geometric backoff.
//!
//! Only writes are retried. Reads and removals pass through untouched,
//! and failures that retrying cannot fix (configuration, codec
//! rejections) are returned immediately no matter the budget.

use crate::error::Result;
use crate::events::{EventBus, StorageEvent};
use crate::storage::contract::{SharedStorage, Storage};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Governs how many attempts a failing write gets and how long to wait
/// between them.
///
/// `max_retries` is the total attempt budget: a write is attempted at
/// most that many times, so `max_retries = 1` means one attempt and no
/// retries. A budget of zero behaves as one attempt. The wait before the
/// retry following failure `i` (zero-based) is
/// `retry_delay * backoff_multiplier^i`; the default multiplier of `1.0`
/// keeps the delay fixed.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts for a failing write.
    pub max_retries: u32,
    /// Base delay between attempts.
    pub retry_delay: Duration,
    /// Multiplier applied to the delay per failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            backoff_multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows the `failures`-th failed
    /// attempt (zero-based).
    pub fn delay_for(&self, failures: u32) -> Duration {
        self.retry_delay.mul_f64(self.backoff_multiplier.powi(failures as i32))
    }
}

/// Decorator that re-attempts failed writes.
pub struct RetryLayer {
    inner: SharedStorage,
    policy: RetryPolicy,
    events: Option<EventBus>,
}

impl RetryLayer {
    /// Wraps `inner` with the given retry policy.
    pub fn new(inner: SharedStorage, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            events: None,
        }
    }

    /// Attaches an event bus. Each scheduled retry announces a retry
    /// event, and exhausting the budget announces a terminal error event
    /// before the failure is returned.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }
}

#[async_trait]
impl Storage for RetryLayer {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match self.inner.set(key, value.clone()).await {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(key = %key, attempt = attempt, "write succeeded after retry");
                    }
                    return Ok(());
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.policy.max_retries => {
                    error!(
                        key = %key,
                        attempts = attempt,
                        error = %e,
                        "write failed, attempt budget exhausted"
                    );
                    if let Some(events) = &self.events {
                        events.emit(&StorageEvent::Error {
                            key: key.to_string(),
                            error: e.to_string(),
                        });
                    }
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.policy.delay_for(attempt - 1);
                    warn!(
                        key = %key,
                        attempt = attempt,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "write failed, retrying"
                    );
                    if let Some(events) = &self.events {
                        events.emit(&StorageEvent::Retry {
                            key: key.to_string(),
                            attempt,
                            error: e.to_string(),
                            delay,
                        });
                    }
                    sleep(delay).await;
                }
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.inner.flush().await
    }
}
