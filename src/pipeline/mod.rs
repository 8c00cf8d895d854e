//! Pipeline Assembly
//!
//! This module turns configuration into a running decorator chain. The
//! [`StorageOptions`] struct is the whole configuration surface; the
//! factory in [`factory`] validates it, resolves the backend, and stacks
//! the layers. Consumers interact with the result through
//! [`DebouncedStorage`], never with individual layers.

pub mod factory;
pub mod options;

// Re-export commonly used types
pub use factory::{create_debounced_storage, DebouncedStorage};
pub use options::StorageOptions;
