//! Persisted live mask settings.

use std::sync::Arc;

use spyweb_protocols::MaskSettings;

use crate::error::StoreError;
use crate::storage::KeyValueStorage;

/// The settings document under one storage key.
#[derive(Clone)]
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Stored settings, or the defaults when nothing was saved yet.
    pub async fn load(&self) -> Result<MaskSettings, StoreError> {
        Ok(self.get().await?.unwrap_or_default())
    }

    /// Stored settings, if any.
    pub async fn get(&self) -> Result<Option<MaskSettings>, StoreError> {
        let Some(value) = self.storage.get(&self.key).await? else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("Failed to read settings: {}", e)))
    }

    pub async fn save(&self, settings: &MaskSettings) -> Result<(), StoreError> {
        let value = serde_json::to_value(settings)
            .map_err(|e| StoreError::Serialization(format!("Failed to write settings: {}", e)))?;
        self.storage.set(&self.key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use spyweb_protocols::{MaskSpec, Scope, VisualMode};

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let store = SettingsStore::new(Arc::new(MemoryStorage::new()), "maskSettings");
        assert!(store.get().await.unwrap().is_none());
        assert_eq!(store.load().await.unwrap(), MaskSettings::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = SettingsStore::new(Arc::new(MemoryStorage::new()), "maskSettings");
        let settings = MaskSettings::new(MaskSpec::color(Some("#ff0000")), Scope::All);
        store.save(&settings).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.spec.visual_mode, VisualMode::Color);
        assert_eq!(loaded.mask_scope, Scope::All);
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_partial_document_fills_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set("maskSettings", serde_json::json!({"maskType": "blur"}))
            .await
            .unwrap();
        let store = SettingsStore::new(storage, "maskSettings");

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.spec.visual_mode, VisualMode::Blur);
        assert_eq!(loaded.mask_scope, Scope::Current);
    }
}
