//! # SpyWeb Store
//!
//! Persistence for mask records and settings.
//!
//! All state lives in a [`KeyValueStorage`] under two keys: the record
//! namespace (domain → ordered records) and the settings key. The
//! [`MaskStore`] and [`SettingsStore`] views read and write whole values,
//! and [`ExportBundle`] moves both in and out as one JSON document.

mod bundle;
mod error;
mod mask_store;
mod settings;
mod storage;

pub use bundle::{BUNDLE_VERSION, BundleSettings, ExportBundle, ImportSummary};
pub use error::StoreError;
pub use mask_store::{AddOutcome, MaskCollection, MaskStore};
pub use settings::SettingsStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
