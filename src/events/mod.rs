//! Lifecycle event definitions and the shared subscriber registry.
//!
//! One [`EventBus`] is created per pipeline and cloned into every layer
//! that announces something. See [`bus`] for the dispatch rules.

pub mod bus;

// Re-export commonly used types
pub use bus::{EventBus, EventCallback, EventKind, StorageEvent};
