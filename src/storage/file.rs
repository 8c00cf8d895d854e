//! File-backed backend: one file per key under a root directory.
//!
//! Key names are encoded so arbitrary keys map to portable file names,
//! and distinct keys never collide. Values survive process restarts,
//! which makes this the persistent counterpart of [`MemoryBackend`].
//!
//! [`MemoryBackend`]: crate::storage::memory::MemoryBackend

use crate::error::{Result, StorageError};
use crate::storage::contract::Storage;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Persistent backend that stores each key in its own file.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens the backend rooted at `root`, creating the directory if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::BackendUnavailable`] when `root` exists
    /// but is not a directory, or cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(StorageError::BackendUnavailable(format!(
                "{} exists and is not a directory",
                root.display()
            )));
        }
        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::BackendUnavailable(format!("cannot create {}: {}", root.display(), e))
        })?;
        debug!(root = %root.display(), "file backend opened");
        Ok(Self { root })
    }

    /// The directory this backend stores files under.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

#[async_trait]
impl Storage for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Encodes a key into a file name.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte
/// becomes `%XX`. The mapping is injective, so distinct keys always land
/// in distinct files.
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => name.push(byte as char),
            _ => name.push_str(&format!("%{:02X}", byte)),
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("profile", "data".to_string()).await.unwrap();
        assert_eq!(backend.get("profile").await.unwrap(), Some("data".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        assert_eq!(backend.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("k", "v".to_string()).await.unwrap();
        backend.remove("k").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        assert!(backend.remove("nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let backend = FileBackend::open(dir.path()).unwrap();
            backend.set("k", "persisted".to_string()).await.unwrap();
        }
        let backend = FileBackend::open(dir.path()).unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some("persisted".to_string()));
    }

    #[tokio::test]
    async fn test_awkward_keys_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        for key in ["a/b", "..", "with space", "ünïcode", "app:state"] {
            backend.set(key, format!("value of {}", key)).await.unwrap();
        }
        for key in ["a/b", "..", "with space", "ünïcode", "app:state"] {
            assert_eq!(
                backend.get(key).await.unwrap(),
                Some(format!("value of {}", key)),
                "key {:?} did not round-trip",
                key
            );
        }
    }

    #[test]
    fn test_encode_key_is_injective_for_lookalikes() {
        assert_ne!(encode_key("a/b"), encode_key("a%2Fb"));
        assert_ne!(encode_key("a b"), encode_key("a_b"));
        assert_eq!(encode_key("plain-key_1"), "plain-key_1");
    }

    #[test]
    fn test_open_rejects_regular_file_root() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("not-a-dir");
        std::fs::write(&file_path, b"occupied").unwrap();

        match FileBackend::open(&file_path) {
            Err(StorageError::BackendUnavailable(msg)) => {
                assert!(msg.contains("not a directory"));
            }
            other => panic!("expected BackendUnavailable, got {:?}", other),
        }
    }
}
