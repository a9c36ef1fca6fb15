//! Configuration types for Tagboard.
//!
//! Every section defaults independently, so a config file only needs the
//! keys it changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{
    APP_NAME, DEFAULT_ASPECT_RATIO, DEFAULT_BASE_URL, DEFAULT_FEED_URL, MOUNT_DELAY,
    PROGRESS_LINGER, RESIZE_SETTLE, SUBSCRIBE_RETRY, THUMBNAIL_ENDPOINT_PATH, THUMBNAIL_PACING,
};
use crate::grid::AspectRatio;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TagboardConfig {
    /// Dataset tagger server endpoints.
    pub server: ServerConfig,

    /// Tile grid settings.
    pub grid: GridConfig,

    /// Thumbnail generation queue settings.
    pub thumbnails: ThumbnailsConfig,

    /// Log streaming settings.
    pub logs: LogsConfig,
}

// ============================================================================
// Server
// ============================================================================

/// Server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    /// Base URL of the dataset tagger server.
    pub base_url: String,

    /// Path of the thumbnail generation endpoint, relative to `baseUrl`.
    pub thumbnail_path: String,

    /// WebSocket URL of the application feed.
    pub feed_url: String,

    /// Timeout for a single HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            thumbnail_path: THUMBNAIL_ENDPOINT_PATH.to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Full URL of the thumbnail endpoint.
    #[must_use]
    pub fn thumbnail_endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.thumbnail_path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}

// ============================================================================
// Grid
// ============================================================================

/// Tile grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Tile width divided by tile height.
    pub aspect_ratio: f64,

    /// Delay before the first layout after the board is shown, in milliseconds.
    pub mount_delay_ms: u64,

    /// Quiet window after the last resize before relayout, in milliseconds.
    pub resize_settle_ms: u64,
}

impl Default for GridConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            mount_delay_ms: MOUNT_DELAY.as_millis() as u64,
            resize_settle_ms: RESIZE_SETTLE.as_millis() as u64,
        }
    }
}

impl GridConfig {
    /// The configured aspect ratio, or the default if it is not usable.
    #[must_use]
    pub fn aspect(&self) -> AspectRatio {
        AspectRatio::new(self.aspect_ratio).unwrap_or_else(|| {
            tracing::warn!(
                aspect_ratio = self.aspect_ratio,
                "invalid grid aspect ratio in configuration, using default"
            );
            AspectRatio::default()
        })
    }

    #[must_use]
    pub const fn mount_delay(&self) -> Duration { Duration::from_millis(self.mount_delay_ms) }

    #[must_use]
    pub const fn resize_settle(&self) -> Duration { Duration::from_millis(self.resize_settle_ms) }
}

// ============================================================================
// Thumbnails
// ============================================================================

/// Thumbnail queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ThumbnailsConfig {
    /// Pause between two thumbnail requests, in milliseconds.
    pub pacing_ms: u64,

    /// How long the finished progress bar stays visible, in milliseconds.
    pub progress_linger_ms: u64,
}

impl Default for ThumbnailsConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            pacing_ms: THUMBNAIL_PACING.as_millis() as u64,
            progress_linger_ms: PROGRESS_LINGER.as_millis() as u64,
        }
    }
}

impl ThumbnailsConfig {
    #[must_use]
    pub const fn pacing(&self) -> Duration { Duration::from_millis(self.pacing_ms) }

    #[must_use]
    pub const fn progress_linger(&self) -> Duration { Duration::from_millis(self.progress_linger_ms) }
}

// ============================================================================
// Logs
// ============================================================================

/// Log streaming settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LogsConfig {
    /// Poll interval while waiting for the feed socket to open, in milliseconds.
    pub subscribe_retry_ms: u64,
}

impl Default for LogsConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            subscribe_retry_ms: SUBSCRIBE_RETRY.as_millis() as u64,
        }
    }
}

impl LogsConfig {
    #[must_use]
    pub const fn subscribe_retry(&self) -> Duration { Duration::from_millis(self.subscribe_retry_ms) }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/tagboard/config.json, \
         the platform config directory, or ~/.tagboard.json"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in the home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".tagboard.jsonc", ".tagboard.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/tagboard/config.jsonc` or `config.json`
/// 2. `~/.config/tagboard/config.jsonc` or `config.json`
/// 3. the platform config directory (`dirs::config_dir`)
/// 4. `~/.tagboard.jsonc` or `~/.tagboard.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        push_config_files(&PathBuf::from(xdg_config).join(APP_NAME), &mut paths);
    }

    // XDG_CONFIG_HOME may already point at ~/.config
    if let Some(home) = dirs::home_dir() {
        push_config_files(&home.join(".config").join(APP_NAME), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_config_files(&config_dir.join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

fn push_config_files(dir: &Path, paths: &mut Vec<PathBuf>) {
    for filename in CONFIG_FILE_NAMES {
        let path = dir.join(filename);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
}

/// Loads the configuration from the first available config file.
///
/// Comments (`//` and `/* */`) are stripped before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, `ConfigError::IoError` if one exists but could not
/// be read, and `ConfigError::ParseError` if it contains invalid JSON.
pub fn load_config() -> Result<(TagboardConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.is_file() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::IoError` if the file could not be read and
/// `ConfigError::ParseError` if it contains invalid JSON.
pub fn load_config_from_path(path: &Path) -> Result<(TagboardConfig, PathBuf), ConfigError> {
    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: TagboardConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Parses configuration from a JSONC string.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` if the text is not valid JSONC.
pub fn parse_config(text: &str) -> Result<TagboardConfig, ConfigError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    Ok(serde_json::from_reader(reader)?)
}
