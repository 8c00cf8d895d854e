//! Chain assembly and the item-oriented consumer surface.
//!
//! [`DebouncedStorage::assemble`] turns a backend identifier and a set of
//! options into a ready pipeline: it validates the options, resolves the
//! backend, stacks exactly the decorators the options ask for, and wires
//! one event bus through every layer that announces something.

use crate::error::{Result, StorageError};
use crate::events::{EventBus, EventCallback, EventKind};
use crate::layers::{
    CodecLayer, DebounceLayer, DebounceOptions, EventLayer, RetryLayer, RetryPolicy, TtlLayer,
};
use crate::pipeline::options::StorageOptions;
use crate::storage::{BackendId, BaseStorage, SharedStorage};
use std::sync::Arc;
use tracing::{debug, info};

/// An assembled pipeline, shaped the way state-persistence consumers
/// expect: item-oriented accessors over string values.
///
/// # Example
///
/// ```ignore
/// use debouncekv::{BackendId, DebouncedStorage, StorageOptions};
/// use std::time::Duration;
///
/// let storage = DebouncedStorage::assemble(
///     BackendId::Memory,
///     StorageOptions {
///         debounce_time: Some(Duration::from_secs(2)),
///         max_retries: Some(3),
///         ..Default::default()
///     },
/// )?;
///
/// storage.set_item("draft", "first").await?;
/// storage.set_item("draft", "second").await?; // replaces the first
/// storage.flush().await?;                     // "second" lands now
/// ```
pub struct DebouncedStorage {
    chain: SharedStorage,
    events: EventBus,
}

impl DebouncedStorage {
    /// Builds the decorator chain for `backend` according to `options`.
    ///
    /// Layers are stacked in a fixed order. From the backend outwards:
    /// TTL, codec, retry, debounce, events. The serialize function
    /// therefore applies to the plain value and the backend stores a
    /// readable expiry envelope; retries sit below the debounce timer so
    /// one coalesced write gets its full attempt budget; the event layer
    /// always wraps the outermost position so every operation is
    /// observable. Layers whose options are absent are left out.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] when the options are
    /// inconsistent (half a serialize/deserialize pair, a retry budget of
    /// zero) and [`StorageError::BackendUnavailable`] when the backend
    /// cannot be resolved.
    pub fn assemble(backend: BackendId, options: StorageOptions) -> Result<Self> {
        validate(&options)?;

        let events = EventBus::new();
        register_callbacks(&events, &options);

        let mut chain: SharedStorage = Arc::new(BaseStorage::new(backend.resolve()?));

        if let Some(ttl) = options.ttl {
            chain = Arc::new(TtlLayer::new(chain, ttl));
            debug!(ttl_ms = ttl.as_millis() as u64, "ttl layer attached");
        }

        // validate() already rejected half a pair, so presence of one
        // function implies the other.
        if let (Some(serialize), Some(deserialize)) =
            (options.serialize.clone(), options.deserialize.clone())
        {
            chain = Arc::new(CodecLayer::new(chain, serialize, deserialize));
            debug!("codec layer attached");
        }

        if options.wants_retry() {
            let defaults = RetryPolicy::default();
            let policy = RetryPolicy {
                max_retries: options.max_retries.unwrap_or(defaults.max_retries),
                retry_delay: options.retry_delay.unwrap_or(defaults.retry_delay),
                backoff_multiplier: options
                    .backoff_multiplier
                    .unwrap_or(defaults.backoff_multiplier),
            };
            debug!(
                max_retries = policy.max_retries,
                retry_delay_ms = policy.retry_delay.as_millis() as u64,
                "retry layer attached"
            );
            chain = Arc::new(RetryLayer::new(chain, policy).with_events(events.clone()));
        }

        if options.wants_debounce() {
            let opts = DebounceOptions {
                debounce_time: options.debounce_time.unwrap_or_default(),
                throttle_time: options.throttle_time,
                immediately: options.immediately.unwrap_or(false),
            };
            debug!(
                debounce_ms = opts.debounce_time.as_millis() as u64,
                immediately = opts.immediately,
                "debounce layer attached"
            );
            chain = Arc::new(DebounceLayer::new(chain, opts, events.clone()));
        }

        chain = Arc::new(EventLayer::new(chain, events.clone()));

        info!("storage pipeline assembled");
        Ok(Self { chain, events })
    }

    /// Fetches the value stored under `name`, or `None`.
    pub async fn get_item(&self, name: &str) -> Result<Option<String>> {
        self.chain.get(name).await
    }

    /// Stores `value` under `name`, subject to the configured timing,
    /// retry, TTL, and codec layers.
    pub async fn set_item(&self, name: &str, value: impl Into<String>) -> Result<()> {
        self.chain.set(name, value.into()).await
    }

    /// Removes the value stored under `name`.
    pub async fn remove_item(&self, name: &str) -> Result<()> {
        self.chain.remove(name).await
    }

    /// Forces any pending coalesced write out immediately.
    pub async fn flush(&self) -> Result<()> {
        self.chain.flush().await
    }

    /// Registers a callback for one event kind.
    pub fn on(&self, kind: EventKind, callback: EventCallback) {
        self.events.on(kind, callback);
    }

    /// The event bus shared by every layer of this pipeline.
    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

/// Builds a pipeline in one call.
///
/// Convenience wrapper over [`DebouncedStorage::assemble`] for callers
/// that configure everything up front.
pub fn create_debounced_storage(
    backend: BackendId,
    options: StorageOptions,
) -> Result<DebouncedStorage> {
    DebouncedStorage::assemble(backend, options)
}

fn validate(options: &StorageOptions) -> Result<()> {
    if options.serialize.is_some() != options.deserialize.is_some() {
        return Err(StorageError::Configuration(
            "serialize and deserialize must be supplied together".to_string(),
        ));
    }
    if options.max_retries == Some(0) {
        return Err(StorageError::Configuration(
            "max_retries must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn register_callbacks(events: &EventBus, options: &StorageOptions) {
    let callbacks: [(EventKind, &Option<EventCallback>); 5] = [
        (EventKind::Write, &options.on_write),
        (EventKind::Save, &options.on_save),
        (EventKind::Flush, &options.on_flush),
        (EventKind::Retry, &options.on_retry),
        (EventKind::Error, &options.on_error),
    ];
    for (kind, callback) in callbacks {
        if let Some(callback) = callback {
            events.on(kind, Arc::clone(callback));
        }
    }
}
