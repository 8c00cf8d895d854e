//! Lifecycle notification decorator.
//!
//! Sits at the outermost position of every assembled chain and announces
//! each operation on the pipeline's bus. The write event fires before
//! the call is delegated, so subscribers see every requested write even
//! when a layer below coalesces it away or drops it. Get and remove
//! events fire only after the delegate succeeds.

use crate::error::Result;
use crate::events::{EventBus, StorageEvent};
use crate::storage::contract::{SharedStorage, Storage};
use async_trait::async_trait;

/// Decorator that announces every operation on the shared bus.
pub struct EventLayer {
    inner: SharedStorage,
    events: EventBus,
}

impl EventLayer {
    /// Wraps `inner`, announcing on `events`.
    pub fn new(inner: SharedStorage, events: EventBus) -> Self {
        Self { inner, events }
    }

    /// The bus this layer announces on.
    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

#[async_trait]
impl Storage for EventLayer {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.inner.get(key).await?;
        self.events.emit(&StorageEvent::Get {
            key: key.to_string(),
            value: value.clone(),
        });
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.events.emit(&StorageEvent::Write {
            key: key.to_string(),
            value: value.clone(),
        });
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await?;
        self.events.emit(&StorageEvent::Remove {
            key: key.to_string(),
        });
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.inner.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::storage::mock::RecordingBackend;
    use parking_lot::Mutex as SyncMutex;
    use std::sync::Arc;

    fn eventful(recorder: &Arc<RecordingBackend>) -> (EventLayer, EventBus) {
        let events = EventBus::new();
        let backend: SharedStorage = recorder.clone();
        (EventLayer::new(backend, events.clone()), events)
    }

    #[tokio::test]
    async fn test_write_event_fires_before_delegation() {
        let recorder = RecordingBackend::failing(1);
        let (layer, events) = eventful(&recorder);
        let writes = Arc::new(SyncMutex::new(Vec::new()));

        let sink = Arc::clone(&writes);
        events.on(
            EventKind::Write,
            Arc::new(move |event: &StorageEvent| {
                if let StorageEvent::Write { key, value } = event {
                    sink.lock().push((key.clone(), value.clone()));
                }
            }),
        );

        // The backend rejects the write, but the write event already fired.
        layer.set("k", "v".to_string()).await.unwrap_err();
        assert_eq!(writes.lock().as_slice(), &[("k".to_string(), "v".to_string())]);
    }

    #[tokio::test]
    async fn test_get_event_carries_result() {
        let recorder = RecordingBackend::new();
        recorder.preload("k", "stored");
        let (layer, events) = eventful(&recorder);
        let gets = Arc::new(SyncMutex::new(Vec::new()));

        let sink = Arc::clone(&gets);
        events.on(
            EventKind::Get,
            Arc::new(move |event: &StorageEvent| {
                if let StorageEvent::Get { value, .. } = event {
                    sink.lock().push(value.clone());
                }
            }),
        );

        layer.get("k").await.unwrap();
        layer.get("missing").await.unwrap();

        assert_eq!(
            gets.lock().as_slice(),
            &[Some("stored".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_remove_event_fires_after_success() {
        let recorder = RecordingBackend::new();
        let (layer, events) = eventful(&recorder);
        let removed = Arc::new(SyncMutex::new(Vec::new()));

        let sink = Arc::clone(&removed);
        events.on(
            EventKind::Remove,
            Arc::new(move |event: &StorageEvent| {
                if let StorageEvent::Remove { key } = event {
                    sink.lock().push(key.clone());
                }
            }),
        );

        layer.remove("k").await.unwrap();
        assert_eq!(removed.lock().as_slice(), &["k".to_string()]);
    }
}
