//! # DebounceKV - Coalescing Decorators for Key-Value Storage
//!
//! DebounceKV wraps any asynchronous key-value backend in a chain of
//! composable decorators that control *when* and *how* values are
//! persisted: writes are debounced into a single delayed write, spaced
//! by a throttle floor, retried with backoff when the backend fails,
//! expired with a TTL, and run through a caller-supplied codec, while a
//! synchronous event bus announces everything the chain does.
//!
//! ## Features
//!
//! - **Debounced Writes**: Rapid writes coalesce into one delayed write;
//!   only the latest value reaches the backend
//! - **Throttle Floor**: A minimum spacing between completed writes,
//!   with early calls dropped outright
//! - **Bounded Retry**: Failed writes are re-attempted with geometric
//!   backoff and announced on the event bus
//! - **TTL Expiry**: Values expire a fixed duration after each write and
//!   are evicted lazily on read
//! - **Pluggable Backends**: In-memory, file-per-key, or any
//!   `Arc<dyn Storage>` a caller supplies
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       DebouncedStorage                          │
//! │                                                                 │
//! │  set_item ──► ┌────────────┐                                    │
//! │  get_item ──► │ EventLayer │──┐        ┌───────────────────┐    │
//! │  flush    ──► └────────────┘  │        │     EventBus      │    │
//! │                               │        │ write/save/flush/ │    │
//! │               ┌────────────┐  │        │ retry/error ...   │    │
//! │               │  Debounce  │◄─┘   ┌───►└───────────────────┘    │
//! │               │  (timer)   │──────┘              ▲              │
//! │               └─────┬──────┘                     │              │
//! │               ┌─────▼──────┐─────────────────────┘              │
//! │               │   Retry    │                                    │
//! │               └─────┬──────┘                                    │
//! │               ┌─────▼──────┐   ┌────────────┐   ┌───────────┐   │
//! │               │   Codec    │──►│    Ttl     │──►│   Base    │   │
//! │               └────────────┘   └────────────┘   └─────┬─────┘   │
//! └────────────────────────────────────────────────────────┼────────┘
//!                                                          ▼
//!                                          memory / file / custom backend
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use debouncekv::{create_debounced_storage, BackendId, EventKind, StorageOptions};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> debouncekv::Result<()> {
//!     let storage = create_debounced_storage(
//!         "memory".parse::<BackendId>()?,
//!         StorageOptions {
//!             debounce_time: Some(Duration::from_secs(2)),
//!             max_retries: Some(3),
//!             ttl: Some(Duration::from_secs(3600)),
//!             ..Default::default()
//!         },
//!     )?;
//!
//!     storage.on(EventKind::Save, Arc::new(|event| {
//!         println!("persisted: {:?}", event);
//!     }));
//!
//!     // Only "third" reaches the backend, two seconds after the burst.
//!     storage.set_item("draft", "first").await?;
//!     storage.set_item("draft", "second").await?;
//!     storage.set_item("draft", "third").await?;
//!
//!     // Or force it out now.
//!     storage.flush().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: The async storage contract, backends, and backend
//!   name resolution
//! - [`layers`]: The decorators (debounce, retry, TTL, codec, events)
//! - [`pipeline`]: Options, validation, and chain assembly
//! - [`events`]: Lifecycle events and the subscriber registry
//! - [`error`]: The error taxonomy shared by every layer
//!
//! ## Design Highlights
//!
//! ### One Pending Slot
//!
//! The debounce layer holds a single pending write, replaced by every
//! newer call across keys as well as within a key. The backend sees the
//! latest requested state and nothing else, and no delivered write is
//! ever older than one delivered before it.
//!
//! ### Synchronous Events
//!
//! Event callbacks run inline, in registration order, on the task that
//! emits the event. A subscriber that sees a save event knows the write
//! has already been delivered to the wrapped layer.
//!
//! ### Lazy Expiry
//!
//! TTL entries carry their deadline in the stored envelope and are
//! purged on the read that finds them expired. There is no background
//! sweeper to configure or shut down, and deadlines survive process
//! restarts on persistent backends.

pub mod error;
pub mod events;
pub mod layers;
pub mod pipeline;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::{Result, StorageError};
pub use events::{EventBus, EventCallback, EventKind, StorageEvent};
pub use layers::{
    CodecLayer, DebounceLayer, DebounceOptions, DeserializeFn, EventLayer, RetryLayer,
    RetryPolicy, SerializeFn, TtlEnvelope, TtlLayer,
};
pub use pipeline::{create_debounced_storage, DebouncedStorage, StorageOptions};
pub use storage::{
    BackendId, BaseStorage, FileBackend, MemoryBackend, SharedStorage, Storage, DEFAULT_FILE_ROOT,
};

/// Version of DebounceKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
