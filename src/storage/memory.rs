//! In-memory backend: a process-local map behind a lock.
//!
//! Fast and dependency-free, but nothing survives the process. This is
//! the backend behind the `"memory"` name and the default choice for
//! tests and short-lived state.

use crate::error::Result;
use crate::storage::contract::Storage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Process-local key-value backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Drops every stored key.
    pub fn clear(&self) {
        self.data.lock().clear();
    }
}

#[async_trait]
impl Storage for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.data.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.data.lock().remove(key);
        Ok(())
    }
}
