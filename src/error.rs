//! Error types shared by every backend and decorator in the crate.
//!
//! All fallible operations return [`Result`], and the retry decorator
//! consults [`StorageError::is_retryable`] to decide whether a failed
//! write is worth another attempt. Deterministic failures (bad
//! configuration, codec rejections) are never retried.

use thiserror::Error;

/// Errors that can occur while resolving, assembling, or using storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The pipeline configuration is unusable: an unknown backend name,
    /// an invalid option combination, or a chain that cannot be built.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The selected backend cannot be used in the current environment.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A user-supplied serialize function rejected a value. Nothing was
    /// handed to the wrapped layer.
    #[error("serialize failed for key {key:?}: {reason}")]
    Serialize { key: String, reason: String },

    /// A user-supplied deserialize function rejected a stored value. The
    /// stored value is left untouched.
    #[error("deserialize failed for key {key:?}: {reason}")]
    Deserialize { key: String, reason: String },

    /// The wrapped layer rejected a write.
    #[error("write failed for key {key:?}: {reason}")]
    WriteFailed { key: String, reason: String },

    /// An I/O failure from a file-backed backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns `true` when retrying the failed operation may succeed.
    ///
    /// Transient failures (rejected writes, I/O errors, an unreachable
    /// backend) are retryable; configuration and codec failures are
    /// deterministic and reported immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::WriteFailed { .. }
                | StorageError::Io(_)
                | StorageError::BackendUnavailable(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StorageError>;
