//! Key-value persistence backends.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;

/// Durable key-value storage holding one JSON value per key.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a key; `None` when it was never written or has been removed.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a key, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory storage for tests and ephemeral sessions.
pub struct MemoryStorage {
    values: RwLock<HashMap<String, Value>>,
    available: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the storage going away; every call fails while unavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory storage disabled".to_string()))
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.check()?;
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.check()?;
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut values = self.values.write().await;
        values.remove(key);
        Ok(())
    }
}

/// File system storage.
///
/// Each key is one pretty-printed JSON file:
/// ```text
/// {storage_path}/
/// ├── maskedElements.json
/// └── maskSettings.json
/// ```
pub struct FileStorage {
    storage_path: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    pub async fn new(storage_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(&storage_path).await?;

        debug!("FileStorage initialized at {:?}", storage_path);

        Ok(Self { storage_path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.storage_path
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.storage_path
            .join(format!("{}.json", Self::sanitize_key(key)))
    }

    /// Sanitize a key for use as a file name.
    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_str(&content).map_err(|e| {
            StoreError::Serialization(format!("Failed to parse {:?}: {}", path, e))
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let content = serde_json::to_string_pretty(&value).map_err(|e| {
            StoreError::Serialization(format!("Failed to serialize '{}': {}", key, e))
        })?;

        // Write beside the target and rename so readers never see a partial file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Saved key '{}' to {:?}", key, path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed key '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
