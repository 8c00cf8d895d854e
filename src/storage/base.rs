//! Chain anchor: the identity decorator over a resolved backend.

use crate::error::Result;
use crate::storage::contract::{SharedStorage, Storage};
use async_trait::async_trait;

/// Pass-through wrapper that anchors a decorator chain.
///
/// Every call delegates unchanged to the wrapped backend and every
/// result or failure propagates as-is. Decorators stack on top of this,
/// so the assembled chain always bottoms out in a layer with no behavior
/// of its own.
pub struct BaseStorage {
    backend: SharedStorage,
}

impl BaseStorage {
    /// Anchors a chain on `backend`.
    pub fn new(backend: SharedStorage) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Storage for BaseStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.backend.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.backend.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.backend.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::RecordingBackend;

    #[tokio::test]
    async fn test_delegates_every_operation() {
        let recorder = RecordingBackend::new();
        let backend: SharedStorage = recorder.clone();
        let base = BaseStorage::new(backend);

        base.set("k", "v".to_string()).await.unwrap();
        assert_eq!(base.get("k").await.unwrap(), Some("v".to_string()));
        base.remove("k").await.unwrap();
        base.flush().await.unwrap();

        assert_eq!(recorder.set_count(), 1);
        assert_eq!(recorder.get_count(), 1);
        assert_eq!(recorder.remove_count(), 1);
    }

    #[tokio::test]
    async fn test_propagates_failures_unchanged() {
        let recorder = RecordingBackend::failing(1);
        let backend: SharedStorage = recorder.clone();
        let base = BaseStorage::new(backend);

        let err = base.set("k", "v".to_string()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(recorder.set_count(), 1);
    }
}
