//! Write coalescing: debounce, throttle floor, and immediate bypass.
//!
//! This layer is the reason the crate exists. Rapid writes are absorbed
//! into a single pending slot and delivered to the wrapped layer once,
//! after a quiet period, instead of hammering the backend on every call.
//!
//! ## State machine
//!
//! ```text
//!            set(k, v)                       timer fires
//!   ┌──────┐ ───────────► ┌─────────────┐ ───────────────► write + save
//!   │ Idle │              │ Pending     │                  event, back
//!   └──────┘ ◄─────────── │ {key,value} │ ◄─── set(k2,v2)  to Idle
//!              flush /     └─────────────┘      replaces the
//!              timer write                      slot, re-arms
//! ```
//!
//! The pending slot holds exactly one write. A newer call replaces it,
//! across keys as well as within a key, so only the latest requested
//! write ever reaches the backend. A throttle floor, when configured,
//! drops calls that arrive too soon after the last completed write
//! before they touch the slot at all.

use crate::error::Result;
use crate::events::{EventBus, StorageEvent};
use crate::storage::contract::{SharedStorage, Storage};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace, warn};

/// Timing options for [`DebounceLayer`].
#[derive(Debug, Clone, Default)]
pub struct DebounceOptions {
    /// Quiet period before a coalesced write is delivered. Zero delivers
    /// on the next timer tick, which still coalesces bursts issued
    /// within one task poll.
    pub debounce_time: Duration,
    /// Minimum spacing between completed writes. Calls arriving earlier
    /// are dropped outright, not queued.
    pub throttle_time: Option<Duration>,
    /// Bypass coalescing entirely and write through on every call.
    pub immediately: bool,
}

/// The single coalesced write awaiting its timer.
#[derive(Debug, Clone)]
struct PendingWrite {
    key: String,
    value: String,
}

/// Mutable timing state, shared with the armed timer task.
#[derive(Default)]
struct DebounceState {
    /// At most one write waits here; newer calls replace it.
    pending: Option<PendingWrite>,
    /// Handle to the armed timer task, if any.
    timer: Option<JoinHandle<()>>,
    /// Completion time of the last delivered write. The throttle floor
    /// measures against this, so it moves only when a write lands, not
    /// when one is queued or flushed.
    last_write: Option<Instant>,
}

/// Decorator that coalesces rapid writes into one delayed write.
///
/// Reads and removals pass straight through. Dropping the layer while a
/// timer is armed does not cancel it: the spawned task holds everything
/// it needs, so the pending write still lands.
pub struct DebounceLayer {
    inner: SharedStorage,
    opts: DebounceOptions,
    events: EventBus,
    state: Arc<Mutex<DebounceState>>,
}

impl DebounceLayer {
    /// Wraps `inner` with the given timing options. Delivered writes
    /// announce a save event on `events`; explicit flushes announce a
    /// flush event as well.
    pub fn new(inner: SharedStorage, opts: DebounceOptions, events: EventBus) -> Self {
        Self {
            inner,
            opts,
            events,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    /// True while a coalesced write is waiting for its timer.
    pub async fn has_pending(&self) -> bool {
        self.state.lock().await.pending.is_some()
    }
}

#[async_trait]
impl Storage for DebounceLayer {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if self.opts.immediately {
            self.inner.set(key, value.clone()).await?;
            self.events.emit(&StorageEvent::Save {
                key: key.to_string(),
                value,
            });
            return Ok(());
        }

        let mut state = self.state.lock().await;

        if let (Some(throttle), Some(last)) = (self.opts.throttle_time, state.last_write) {
            if last.elapsed() < throttle {
                trace!(key = %key, "write dropped by throttle floor");
                return Ok(());
            }
        }

        state.pending = Some(PendingWrite {
            key: key.to_string(),
            value,
        });

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        // Anchor the deadline now so scheduling latency cannot stretch
        // the quiet period.
        let deadline = Instant::now() + self.opts.debounce_time;
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let shared = Arc::clone(&self.state);

        state.timer = Some(tokio::spawn(async move {
            sleep_until(deadline).await;

            let mut state = shared.lock().await;
            let write = match state.pending.take() {
                Some(write) => write,
                None => return,
            };

            match inner.set(&write.key, write.value.clone()).await {
                Ok(()) => {
                    state.last_write = Some(Instant::now());
                    events.emit(&StorageEvent::Save {
                        key: write.key,
                        value: write.value,
                    });
                }
                Err(e) => {
                    // Keep the write so a later flush or timer can still
                    // deliver it.
                    warn!(key = %write.key, error = %e, "deferred write failed, keeping it pending");
                    state.pending = Some(write);
                }
            }
        }));

        trace!(
            key = %key,
            delay_ms = self.opts.debounce_time.as_millis() as u64,
            "write coalesced, timer armed"
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }

    /// Cancels the armed timer and delivers the pending write right
    /// away, if there is one. The throttle reference is left alone, so a
    /// flush never resets the spacing between timed writes.
    async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        if let Some(write) = state.pending.take() {
            debug!(key = %write.key, "flushing pending write");
            if let Err(e) = self.inner.set(&write.key, write.value.clone()).await {
                state.pending = Some(write);
                return Err(e);
            }
            self.events.emit(&StorageEvent::Save {
                key: write.key,
                value: write.value,
            });
            self.events.emit(&StorageEvent::Flush);
        }

        self.inner.flush().await
    }
}
