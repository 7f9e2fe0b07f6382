//! Per-domain mask record collection.

use std::collections::BTreeMap;
use std::sync::Arc;

use spyweb_protocols::MaskRecord;
use tracing::debug;

use crate::error::StoreError;
use crate::storage::KeyValueStorage;

/// Domain → records in insertion order.
pub type MaskCollection = BTreeMap<String, Vec<MaskRecord>>;

/// What [`MaskStore::add`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The selector was new for the domain.
    Inserted,
    /// The selector already existed; its record was replaced.
    Updated { previous: MaskRecord },
}

/// Mask records persisted under one storage key.
///
/// Every operation reads the whole collection, edits it and writes it
/// back, so the selector check in [`add`](Self::add) always sees the
/// latest persisted state.
#[derive(Clone)]
pub struct MaskStore {
    storage: Arc<dyn KeyValueStorage>,
    namespace: String,
}

impl MaskStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The whole collection.
    pub async fn all(&self) -> Result<MaskCollection, StoreError> {
        let Some(value) = self.storage.get(&self.namespace).await? else {
            return Ok(MaskCollection::new());
        };
        serde_json::from_value(value).map_err(|e| {
            StoreError::Serialization(format!(
                "Failed to read '{}' collection: {}",
                self.namespace, e
            ))
        })
    }

    /// Overwrite the whole collection. Empty domains are dropped.
    pub async fn replace_all(&self, mut collection: MaskCollection) -> Result<(), StoreError> {
        collection.retain(|_, records| !records.is_empty());
        let value = serde_json::to_value(&collection).map_err(|e| {
            StoreError::Serialization(format!(
                "Failed to write '{}' collection: {}",
                self.namespace, e
            ))
        })?;
        self.storage.set(&self.namespace, value).await
    }

    /// Records created under `domain`, whatever their scope.
    pub async fn records_for(&self, domain: &str) -> Result<Vec<MaskRecord>, StoreError> {
        let mut collection = self.all().await?;
        Ok(collection.remove(domain).unwrap_or_default())
    }

    /// Records applicable on `domain`: its own records, then every
    /// `scope = all` record created under another domain.
    pub async fn load(&self, domain: &str) -> Result<Vec<MaskRecord>, StoreError> {
        let collection = self.all().await?;
        let mut records = collection.get(domain).cloned().unwrap_or_default();
        for (other, others) in &collection {
            if other == domain {
                continue;
            }
            records.extend(others.iter().filter(|r| r.applies_to(domain)).cloned());
        }
        Ok(records)
    }

    /// Insert a record, or replace the domain's record with the same selector.
    pub async fn add(&self, domain: &str, record: MaskRecord) -> Result<AddOutcome, StoreError> {
        let mut collection = self.all().await?;
        let records = collection.entry(domain.to_string()).or_default();

        let outcome = match records.iter_mut().find(|r| r.selector == record.selector) {
            Some(existing) => AddOutcome::Updated {
                previous: std::mem::replace(existing, record),
            },
            None => {
                records.push(record);
                AddOutcome::Inserted
            }
        };

        self.replace_all(collection).await?;
        debug!(domain, ?outcome, "Stored mask record");
        Ok(outcome)
    }

    /// Replace the record for `selector` in place, inserting it when absent.
    /// Returns the replaced record.
    pub async fn update(
        &self,
        domain: &str,
        selector: &str,
        record: MaskRecord,
    ) -> Result<Option<MaskRecord>, StoreError> {
        let mut collection = self.all().await?;
        let records = collection.entry(domain.to_string()).or_default();

        let previous = match records.iter_mut().find(|r| r.selector == selector) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                records.push(record);
                None
            }
        };

        self.replace_all(collection).await?;
        Ok(previous)
    }

    /// Remove the domain's record for `selector`.
    pub async fn remove(
        &self,
        domain: &str,
        selector: &str,
    ) -> Result<Option<MaskRecord>, StoreError> {
        let mut collection = self.all().await?;
        let Some(records) = collection.get_mut(domain) else {
            return Ok(None);
        };
        let Some(index) = records.iter().position(|r| r.selector == selector) else {
            return Ok(None);
        };
        let removed = records.remove(index);

        self.replace_all(collection).await?;
        Ok(Some(removed))
    }

    /// Remove the domain's record at `index`.
    pub async fn remove_at(
        &self,
        domain: &str,
        index: usize,
    ) -> Result<Option<MaskRecord>, StoreError> {
        let mut collection = self.all().await?;
        let Some(records) = collection.get_mut(domain) else {
            return Ok(None);
        };
        if index >= records.len() {
            return Ok(None);
        }
        let removed = records.remove(index);

        self.replace_all(collection).await?;
        Ok(Some(removed))
    }

    /// Remove every record of `domain`. Returns how many were removed.
    pub async fn clear_domain(&self, domain: &str) -> Result<usize, StoreError> {
        let mut collection = self.all().await?;
        let removed = collection.remove(domain).map(|r| r.len()).unwrap_or(0);
        if removed > 0 {
            self.replace_all(collection).await?;
        }
        Ok(removed)
    }

    /// Remove every record. Returns how many were removed.
    pub async fn clear_all(&self) -> Result<usize, StoreError> {
        let removed = self.all().await?.values().map(Vec::len).sum();
        self.replace_all(MaskCollection::new()).await?;
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "mask_store_tests.rs"]
mod tests;
