//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_true() -> bool {
    true
}

fn spyweb_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".spyweb")
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub observer: ObserverConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default location of the config file (`~/.spyweb/config.toml`).
    pub fn default_path() -> PathBuf {
        spyweb_home().join("config.toml")
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON document per storage key.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Key under which the domain → records map is stored.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Key under which the live mask settings are stored.
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            namespace: default_namespace(),
            settings_key: default_settings_key(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    spyweb_home().join("storage")
}

fn default_namespace() -> String {
    "maskedElements".to_string()
}

fn default_settings_key() -> String {
    "maskSettings".to_string()
}

/// Page observer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Quiet period after the last host mutation before masks are reapplied.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Inject the early-hide stylesheet at page load.
    #[serde(default = "default_true")]
    pub early_hide: bool,
}

impl ObserverConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            early_hide: default_true(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

/// Edit history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum undo entries kept; the oldest entry is dropped past this.
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

fn default_history_limit() -> usize {
    50
}

/// Mask rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Ancestor levels searched for an opaque background.
    #[serde(default = "default_background_search_depth")]
    pub background_search_depth: usize,

    #[serde(default = "default_blur_radius_px")]
    pub blur_radius_px: u32,

    /// Color used when a color mask finds nothing better.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,

    #[serde(default = "default_font_size_px")]
    pub default_font_size_px: u32,

    /// Timeout for fetching remote mask images.
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
}

impl RenderConfig {
    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_search_depth: default_background_search_depth(),
            blur_radius_px: default_blur_radius_px(),
            fallback_color: default_fallback_color(),
            default_font_size_px: default_font_size_px(),
            image_timeout_secs: default_image_timeout_secs(),
        }
    }
}

fn default_background_search_depth() -> usize {
    10
}

fn default_blur_radius_px() -> u32 {
    10
}

fn default_fallback_color() -> String {
    "#808080".to_string()
}

fn default_font_size_px() -> u32 {
    14
}

fn default_image_timeout_secs() -> u64 {
    10
}

/// Logging settings for the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily log files; `~/.spyweb/logs` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| spyweb_home().join("logs"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
