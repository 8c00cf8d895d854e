//! Expiration decorator.
//!
//! Stamps every stored value with an absolute wall-clock expiry and
//! evicts lazily: expired entries read as absent and are purged from the
//! wrapped layer on the read that discovers them. There is no background
//! sweeper; an entry nobody reads simply stays until its key is next
//! touched.

use crate::error::{Result, StorageError};
use crate::storage::contract::{SharedStorage, Storage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Persisted wrapper written in place of the raw value.
///
/// Serialized as `{"value": "...", "expiresAt": <epoch-ms>}`, which keeps
/// stored entries self-describing: any reader can recover both the value
/// and its deadline without consulting the layer that wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlEnvelope {
    /// The wrapped value, exactly as the layer above handed it down.
    pub value: String,
    /// Absolute expiry, milliseconds since the Unix epoch.
    #[serde(rename = "expiresAt")]
    pub expires_at: u64,
}

impl TtlEnvelope {
    /// True once the clock has passed `expires_at`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }
}

/// Decorator that expires stored values a fixed duration after each
/// write.
///
/// Expiry is judged against the wall clock, so deadlines hold across
/// process restarts when the backend is persistent. A malformed envelope
/// reads as absent but is left in place, so no data is destroyed on a
/// parse failure.
pub struct TtlLayer {
    inner: SharedStorage,
    ttl: Duration,
}

impl TtlLayer {
    /// Wraps `inner` so every stored value expires `ttl` after its
    /// write.
    pub fn new(inner: SharedStorage, ttl: Duration) -> Self {
        Self { inner, ttl }
    }
}

#[async_trait]
impl Storage for TtlLayer {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let raw = match self.inner.get(key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let envelope: TtlEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(key = %key, error = %e, "malformed expiry envelope, treating as absent");
                return Ok(None);
            }
        };

        if envelope.is_expired(epoch_ms()) {
            debug!(key = %key, expires_at = envelope.expires_at, "entry expired, purging");
            self.inner.remove(key).await?;
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let envelope = TtlEnvelope {
            value,
            expires_at: epoch_ms() + self.ttl.as_millis() as u64,
        };
        let data = serde_json::to_string(&envelope).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.inner.set(key, data).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.inner.flush().await
    }
}

/// Milliseconds since the Unix epoch.
fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
