//! Test double shared by the decorator unit tests.

use crate::error::{Result, StorageError};
use crate::storage::contract::Storage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Backend that records every call for assertions and can inject write
/// failures.
///
/// `sets()` records attempts, not successes, so retry tests can count how
/// often a decorator actually called down. Constructors hand out `Arc`s
/// because tests share one instance between the chain under test and
/// their assertions.
pub(crate) struct RecordingBackend {
    data: Mutex<HashMap<String, String>>,
    sets: Mutex<Vec<(String, String)>>,
    gets: Mutex<Vec<String>>,
    removes: Mutex<Vec<String>>,
    flushes: AtomicUsize,
    failures_left: AtomicUsize,
}

impl RecordingBackend {
    /// A backend that accepts every call.
    pub(crate) fn new() -> Arc<Self> {
        Self::failing(0)
    }

    /// A backend whose first `failures` write attempts fail with a
    /// retryable error.
    pub(crate) fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            data: Mutex::new(HashMap::new()),
            sets: Mutex::new(Vec::new()),
            gets: Mutex::new(Vec::new()),
            removes: Mutex::new(Vec::new()),
            flushes: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(failures),
        })
    }

    /// Stores a value directly, bypassing call recording.
    pub(crate) fn preload(&self, key: &str, value: &str) {
        self.data.lock().insert(key.to_string(), value.to_string());
    }

    /// Reads a value directly, bypassing call recording.
    pub(crate) fn value(&self, key: &str) -> Option<String> {
        self.data.lock().get(key).cloned()
    }

    /// Every `set` attempt in order, including failed ones.
    pub(crate) fn sets(&self) -> Vec<(String, String)> {
        self.sets.lock().clone()
    }

    pub(crate) fn set_count(&self) -> usize {
        self.sets.lock().len()
    }

    pub(crate) fn last_set(&self) -> Option<(String, String)> {
        self.sets.lock().last().cloned()
    }

    pub(crate) fn get_count(&self) -> usize {
        self.gets.lock().len()
    }

    pub(crate) fn remove_count(&self) -> usize {
        self.removes.lock().len()
    }

    pub(crate) fn removes(&self) -> Vec<String> {
        self.removes.lock().clone()
    }

    pub(crate) fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for RecordingBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.lock().push(key.to_string());
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.sets.lock().push((key.to_string(), value.clone()));

        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            });
        }

        self.data.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.removes.lock().push(key.to_string());
        self.data.lock().remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
