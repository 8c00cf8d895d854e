//! Storage Contract and Backends
//!
//! This module defines the asynchronous key-value contract the whole
//! crate is built on, the backends that implement it against real
//! persistence, and the adapter that resolves backend names at assembly
//! time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      decorator chain                        │
//! │                 (see the layers module)                     │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ Storage contract
//!                  ┌─────────────▼─────────────┐
//!                  │        BaseStorage        │
//!                  │      (chain anchor)       │
//!                  └─────────────┬─────────────┘
//!          ┌─────────────────────┼─────────────────────┐
//!          ▼                     ▼                     ▼
//!   ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!   │MemoryBackend│      │ FileBackend │      │  Custom...  │
//!   │ "memory"    │      │ "file:<dir>"│      │ caller-made │
//!   └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! ## Features
//!
//! - **One contract**: backends and decorators implement the same trait
//! - **Named resolution**: `"memory"`, `"file"`, `"file:<root>"` parse
//!   into a [`BackendId`] and fail fast on unknown names
//! - **Bring your own**: any `Arc<dyn Storage>` plugs in unchanged
//! - **Absence is not an error**: missing keys read as `None`
//!
//! ## Example
//!
//! ```ignore
//! use debouncekv::storage::{BackendId, Storage};
//!
//! let backend = "memory".parse::<BackendId>()?.resolve()?;
//! backend.set("name", "Ariz".to_string()).await?;
//! assert_eq!(backend.get("name").await?, Some("Ariz".to_string()));
//! ```

pub mod adapter;
pub mod base;
pub mod contract;
pub mod file;
pub mod memory;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used types
pub use adapter::{BackendId, DEFAULT_FILE_ROOT};
pub use base::BaseStorage;
pub use contract::{SharedStorage, Storage};
pub use file::FileBackend;
pub use memory::MemoryBackend;
