//! Core errors.

use spyweb_store::StoreError;
use thiserror::Error;

/// Failure to obtain a mask image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Image fetch failed: {0}")]
    Fetch(String),

    #[error("Image decode failed: {0}")]
    Decode(String),
}

/// Page observer errors.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid page URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Page observer is not running")]
    ChannelClosed,
}
