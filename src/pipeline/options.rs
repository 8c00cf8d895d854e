//! The configuration surface accepted by the pipeline factory.
//!
//! Every field is optional. Which fields are present decides which
//! decorators get assembled; absent groups cost nothing at runtime
//! because their layers are never constructed.

use crate::events::EventCallback;
use crate::layers::{DeserializeFn, SerializeFn};
use std::fmt;
use std::time::Duration;

/// Options accepted by the storage factory.
///
/// Unknown concerns have no field here on purpose: configuration is
/// validated at assembly time and an unusable combination (half a codec
/// pair, a zero retry budget) is rejected before any backend is touched.
#[derive(Clone, Default)]
pub struct StorageOptions {
    /// Quiet period before a coalesced write is persisted.
    pub debounce_time: Option<Duration>,
    /// Hard floor on the spacing between completed writes; earlier
    /// writes are dropped.
    pub throttle_time: Option<Duration>,
    /// Bypass coalescing and persist every write as it arrives.
    pub immediately: Option<bool>,
    /// Total attempts for a failing write.
    pub max_retries: Option<u32>,
    /// Base delay between write attempts.
    pub retry_delay: Option<Duration>,
    /// Multiplier applied to the retry delay per failed attempt.
    pub backoff_multiplier: Option<f64>,
    /// Lifetime of stored values; expired entries read as absent.
    pub ttl: Option<Duration>,
    /// Serialize function applied to values before they are stored.
    /// Requires `deserialize`.
    pub serialize: Option<SerializeFn>,
    /// Deserialize function applied to stored values on the way out.
    /// Requires `serialize`.
    pub deserialize: Option<DeserializeFn>,
    /// Callback for write events (a write was requested).
    pub on_write: Option<EventCallback>,
    /// Callback for save events (a value reached the wrapped layer).
    pub on_save: Option<EventCallback>,
    /// Callback for flush events.
    pub on_flush: Option<EventCallback>,
    /// Callback for retry events.
    pub on_retry: Option<EventCallback>,
    /// Callback for terminal write error events.
    pub on_error: Option<EventCallback>,
}

impl StorageOptions {
    /// True when any timing option is present.
    pub(crate) fn wants_debounce(&self) -> bool {
        self.debounce_time.is_some() || self.throttle_time.is_some() || self.immediately.is_some()
    }

    /// True when any retry option is present.
    pub(crate) fn wants_retry(&self) -> bool {
        self.max_retries.is_some()
            || self.retry_delay.is_some()
            || self.backoff_multiplier.is_some()
    }

    /// True when a complete codec pair is present.
    pub(crate) fn wants_codec(&self) -> bool {
        self.serialize.is_some() && self.deserialize.is_some()
    }
}

impl fmt::Debug for StorageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageOptions")
            .field("debounce_time", &self.debounce_time)
            .field("throttle_time", &self.throttle_time)
            .field("immediately", &self.immediately)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("ttl", &self.ttl)
            .field("serialize", &self.serialize.is_some())
            .field("deserialize", &self.deserialize.is_some())
            .field("on_write", &self.on_write.is_some())
            .field("on_save", &self.on_save.is_some())
            .field("on_flush", &self.on_flush.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
