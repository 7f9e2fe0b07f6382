//! Export/import of the whole persisted state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spyweb_protocols::MaskSettings;
use tracing::info;

use crate::error::StoreError;
use crate::mask_store::{MaskCollection, MaskStore};
use crate::settings::SettingsStore;

/// Format version written into new bundles.
pub const BUNDLE_VERSION: &str = "1.0.0";

/// Settings section of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_settings: Option<MaskSettings>,
}

/// A portable snapshot of records and settings.
///
/// ```json
/// {
///   "maskedElements": { "example.com": [ ... ] },
///   "settings": { "maskSettings": { "maskType": "text", ... } },
///   "exportDate": "2024-01-01T00:00:00Z",
///   "version": "1.0.0"
/// }
/// ```
///
/// Every section is optional on import; absent sections leave the stored
/// state untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_elements: Option<MaskCollection>,

    #[serde(default)]
    pub settings: BundleSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    BUNDLE_VERSION.to_string()
}

/// What an import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub domains: usize,
    pub records: usize,
    pub settings: bool,
}

impl ExportBundle {
    /// Snapshot the current stored state.
    pub async fn export(masks: &MaskStore, settings: &SettingsStore) -> Result<Self, StoreError> {
        Ok(Self {
            masked_elements: Some(masks.all().await?),
            settings: BundleSettings {
                mask_settings: settings.get().await?,
            },
            export_date: Some(Utc::now()),
            version: default_version(),
        })
    }

    /// Replace the stored state with the bundle's sections.
    pub async fn import(
        &self,
        masks: &MaskStore,
        settings: &SettingsStore,
    ) -> Result<ImportSummary, StoreError> {
        let mut summary = ImportSummary::default();

        if let Some(collection) = &self.masked_elements {
            summary.domains = collection.values().filter(|r| !r.is_empty()).count();
            summary.records = collection.values().map(Vec::len).sum();
            masks.replace_all(collection.clone()).await?;
        }

        if let Some(mask_settings) = &self.settings.mask_settings {
            settings.save(mask_settings).await?;
            summary.settings = true;
        }

        info!(
            domains = summary.domains,
            records = summary.records,
            settings = summary.settings,
            version = %self.version,
            "Imported bundle"
        );
        Ok(summary)
    }

    /// Parse a bundle, rejecting documents that are not JSON objects.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidBundle(format!("not valid JSON: {}", e)))?;
        if !value.is_object() {
            return Err(StoreError::InvalidBundle(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| StoreError::InvalidBundle(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
