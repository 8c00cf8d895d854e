//! Backend selection: well-known names resolved into usable backends.
//!
//! The pipeline factory accepts a [`BackendId`] instead of a concrete
//! backend so that callers can pick storage by name (`"memory"`,
//! `"file"`, `"file:<root>"`) or hand in their own [`SharedStorage`].
//! Unknown names fail fast at assembly time rather than on first use.

use crate::error::{Result, StorageError};
use crate::storage::contract::SharedStorage;
use crate::storage::file::FileBackend;
use crate::storage::memory::MemoryBackend;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Root directory used by the bare `"file"` backend name.
pub const DEFAULT_FILE_ROOT: &str = "./debouncekv-data";

/// Identifies the backend a pipeline persists into.
pub enum BackendId {
    /// Process-local in-memory map. Fast, nothing survives the process.
    Memory,
    /// One file per key under the given root directory.
    File(PathBuf),
    /// A caller-supplied backend, used as-is.
    Custom(SharedStorage),
}

impl BackendId {
    /// Resolves the identifier into a usable backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::BackendUnavailable`] when a file root
    /// cannot be opened. `Memory` and `Custom` always resolve.
    pub fn resolve(self) -> Result<SharedStorage> {
        match self {
            BackendId::Memory => {
                debug!("resolved memory backend");
                Ok(Arc::new(MemoryBackend::new()))
            }
            BackendId::File(root) => {
                let backend = FileBackend::open(&root)?;
                debug!(root = %root.display(), "resolved file backend");
                Ok(Arc::new(backend))
            }
            BackendId::Custom(backend) => {
                debug!("resolved caller-supplied backend");
                Ok(backend)
            }
        }
    }
}

impl FromStr for BackendId {
    type Err = StorageError;

    /// Parses a well-known backend name.
    ///
    /// `"memory"` selects the in-memory backend, `"file"` the file
    /// backend under [`DEFAULT_FILE_ROOT`], and `"file:<root>"` the file
    /// backend under an explicit root. Anything else is a configuration
    /// error.
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "memory" => Ok(BackendId::Memory),
            "file" => Ok(BackendId::File(PathBuf::from(DEFAULT_FILE_ROOT))),
            other => match other.strip_prefix("file:") {
                Some(root) if !root.is_empty() => Ok(BackendId::File(PathBuf::from(root))),
                _ => Err(StorageError::Configuration(format!(
                    "unsupported storage backend: {}",
                    other
                ))),
            },
        }
    }
}

impl fmt::Debug for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendId::Memory => write!(f, "Memory"),
            BackendId::File(root) => f.debug_tuple("File").field(root).finish(),
            BackendId::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
