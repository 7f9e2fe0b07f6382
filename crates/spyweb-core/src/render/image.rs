//! Mask image probing and tile layout.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;
use tracing::debug;

use crate::error::RenderError;

/// Natural size of a mask image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Loads a mask image far enough to know its natural size.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn probe(&self, source: &str) -> Result<ImageDimensions, RenderError>;
}

/// Decodes `data:` URLs in place and fetches `http(s)` URLs.
pub struct DefaultImageLoader {
    client: reqwest::Client,
}

impl DefaultImageLoader {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RenderError::Fetch(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::Fetch(e.to_string()))?;
        debug!(url, len = bytes.len(), "Fetched mask image");
        Ok(bytes.to_vec())
    }
}

impl Default for DefaultImageLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl ImageLoader for DefaultImageLoader {
    async fn probe(&self, source: &str) -> Result<ImageDimensions, RenderError> {
        let bytes = if source.starts_with("data:") {
            decode_data_url(source)?
        } else if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch(source).await?
        } else {
            return Err(RenderError::UnsupportedSource(source.to_string()));
        };
        dimensions(&bytes)
    }
}

/// Payload bytes of a `data:[<mediatype>][;base64],<data>` URL.
pub fn decode_data_url(source: &str) -> Result<Vec<u8>, RenderError> {
    let rest = source
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::InvalidDataUrl("missing ',' separator".to_string()))?;

    if meta.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact)
            .map_err(|e| RenderError::InvalidDataUrl(e.to_string()))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Natural size of an encoded raster image.
pub fn dimensions(bytes: &[u8]) -> Result<ImageDimensions, RenderError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RenderError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| RenderError::Decode(e.to_string()))?;
    Ok(ImageDimensions { width, height })
}

/// Smallest tile edge in pixels.
pub const MIN_TILE_PX: f64 = 8.0;

/// Upper bound on tiles per mask.
pub const MAX_TILES: usize = 400;

/// Square tiles covering a target box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    /// Edge length in pixels.
    pub tile: f64,
    pub columns: usize,
    pub rows: usize,
}

impl TileLayout {
    /// Tile edge is the smaller target side, at least [`MIN_TILE_PX`]; the
    /// grid is as many whole or partial tiles as it takes to cover the
    /// target. Extreme aspect ratios double the edge until the grid fits in
    /// [`MAX_TILES`]. An empty target gets one tile.
    pub fn for_target(width: f64, height: f64) -> Self {
        if !(width > 0.0 && height > 0.0) {
            return Self {
                tile: 0.0,
                columns: 1,
                rows: 1,
            };
        }
        let mut layout = Self::grid(width, height, width.min(height).max(MIN_TILE_PX));
        while layout.count() > MAX_TILES {
            layout = Self::grid(width, height, layout.tile * 2.0);
        }
        layout
    }

    fn grid(width: f64, height: f64, tile: f64) -> Self {
        Self {
            tile,
            columns: (width / tile).ceil() as usize,
            rows: (height / tile).ceil() as usize,
        }
    }

    pub fn count(&self) -> usize {
        self.columns * self.rows
    }
}
