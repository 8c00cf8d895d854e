//! Value marshaling decorator.
//!
//! Runs every stored value through a caller-supplied serialize function
//! on the way in and the matching deserialize function on the way out.
//! Failures fail closed: a rejected serialize never reaches the wrapped
//! layer, and a rejected deserialize is surfaced without touching what
//! is stored.

use crate::error::{Result, StorageError};
use crate::storage::contract::{SharedStorage, Storage};
use async_trait::async_trait;
use std::sync::Arc;

/// Serializes a value before it is stored. Errors surface as
/// [`StorageError::Serialize`].
pub type SerializeFn = Arc<dyn Fn(&str) -> anyhow::Result<String> + Send + Sync>;

/// Deserializes a stored value on the way out. Errors surface as
/// [`StorageError::Deserialize`].
pub type DeserializeFn = Arc<dyn Fn(&str) -> anyhow::Result<String> + Send + Sync>;

/// Decorator that applies a serialize/deserialize pair to values.
///
/// Keys are never transformed, and removals pass through untouched.
pub struct CodecLayer {
    inner: SharedStorage,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
}

impl CodecLayer {
    /// Wraps `inner` with the given codec pair.
    pub fn new(inner: SharedStorage, serialize: SerializeFn, deserialize: DeserializeFn) -> Self {
        Self {
            inner,
            serialize,
            deserialize,
        }
    }
}

#[async_trait]
impl Storage for CodecLayer {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get(key).await? {
            Some(raw) => {
                let value = (self.deserialize)(&raw).map_err(|e| StorageError::Deserialize {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let serialized = (self.serialize)(&value).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.inner.set(key, serialized).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.inner.flush().await
    }
}
