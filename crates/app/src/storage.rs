//! Key-value persistence adapter
//!
//! The namespaced string key -> JSON string store every repository writes
//! through. Two backends: an in-memory map for tests and a
//! one-file-per-key directory store for the CLI. All writes are
//! best-effort and attempted exactly once per triggering mutation.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// Storage adapter errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem error.
    #[error("storage io error")]
    Io(#[from] std::io::Error),

    /// The key contains characters the backend cannot represent.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Async, namespaced string key -> string value store.
#[automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails; an absent key is `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails or rejects the key.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails or rejects the key.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All keys beginning with `prefix`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// In-memory backend for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value);

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);

        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Directory backend: one `<key>.json` file per record.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a store at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        tokio::fs::create_dir_all(&dir).await?;

        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for DirStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(path).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        tokio::fs::write(path, value).await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();

            let Some(name) = name.to_str() else {
                continue;
            };

            if let Some(key) = name.strip_suffix(".json")
                && key.starts_with(prefix)
            {
                keys.push(key.to_string());
            }
        }

        Ok(keys)
    }
}

/// Keys become file names, so the charset is conservative: ASCII
/// alphanumerics plus `_`, `-`, `.` and `@` (for email-scoped records).
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
