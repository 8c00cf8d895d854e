//! The storage contract implemented by backends and every decorator.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous key-value storage.
///
/// Backends implement this against real persistence; decorators implement
/// it by delegating to a wrapped [`SharedStorage`] and adding one concern
/// (coalescing, retry, expiry, marshaling, notification). Because every
/// layer speaks the same contract, decorators compose in any order and a
/// fully assembled chain is indistinguishable from a plain backend.
///
/// `get` returns `Ok(None)` for an absent key; absence is never an error.
/// Removing an absent key succeeds.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetches the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Forces out any deferred work.
    ///
    /// Plain backends have nothing to defer, so the default is a no-op
    /// and only layers that hold writes back need to override it.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A shareable handle to any storage implementation.
///
/// Decorators hold their wrapped layer through this alias, which is what
/// lets the chain be assembled from configuration at runtime.
pub type SharedStorage = Arc<dyn Storage>;
