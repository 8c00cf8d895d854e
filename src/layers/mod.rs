//! Storage Decorators
//!
//! Each decorator in this module wraps a [`SharedStorage`] and adds one
//! concern, so a pipeline is assembled by stacking exactly the layers a
//! configuration asks for.
//!
//! ## Assembled chain
//!
//! ```text
//!   caller
//!     │
//! ┌───▼────────┐  announces write/get/remove on the bus
//! │ EventLayer │
//! ├────────────┤  coalesces writes, throttle floor, flush
//! │ Debounce   │
//! ├────────────┤  re-attempts failed writes with backoff
//! │ Retry      │
//! ├────────────┤  user serialize/deserialize on values
//! │ Codec      │
//! ├────────────┤  expiry envelope, lazy eviction
//! │ Ttl        │
//! ├────────────┤  identity anchor over the backend
//! │ Base       │
//! └───┬────────┘
//!     ▼
//!   backend
//! ```
//!
//! The codec sits above the TTL layer so serialize applies to the plain
//! value and the backend always stores a readable expiry envelope.
//! Optional layers are simply left out when their options are absent.
//!
//! [`SharedStorage`]: crate::storage::SharedStorage

pub mod codec;
pub mod debounce;
pub mod event;
pub mod retry;
pub mod ttl;

// Re-export commonly used types
pub use codec::{CodecLayer, DeserializeFn, SerializeFn};
pub use debounce::{DebounceLayer, DebounceOptions};
pub use event::EventLayer;
pub use retry::{RetryLayer, RetryPolicy};
pub use ttl::{TtlEnvelope, TtlLayer};
