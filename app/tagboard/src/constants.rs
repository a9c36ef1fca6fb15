//! Application-wide constants for Tagboard.
//!
//! The layout constants must not change: every host rendering a board has to
//! agree on the column choice.

use std::time::Duration;

/// Application name used for config directories and CLI output.
pub const APP_NAME: &str = "tagboard";

// ============================================================================
// Grid fitting
// ============================================================================

/// Upper bound on the number of column counts tried by the grid fitter.
pub const MAX_COLUMNS_TO_TRY: usize = 40;

/// Horizontal overflow admitted for rounding, in pixels.
pub const WIDTH_TOLERANCE_PX: f64 = 1.5;

/// Tiles at or below this edge length (pixels) are unusable.
pub const MIN_TILE_EDGE_PX: f64 = 1.0;

/// Gap used when the gap style is missing, unparseable, or zero.
pub const FALLBACK_GAP_PX: f64 = 0.3;

/// Default tile aspect ratio (width / height).
pub const DEFAULT_ASPECT_RATIO: f64 = 2.0 / 3.0;

// ============================================================================
// Timing
// ============================================================================

/// Delay before the first layout after mount.
pub const MOUNT_DELAY: Duration = Duration::from_millis(100);

/// Quiet window after the last resize before relayout.
pub const RESIZE_SETTLE: Duration = Duration::from_millis(250);

/// Pause between two thumbnail requests.
pub const THUMBNAIL_PACING: Duration = Duration::from_millis(25);

/// How long the finished progress bar stays visible before relayout.
pub const PROGRESS_LINGER: Duration = Duration::from_millis(1500);

/// Poll interval while waiting for the feed socket to open.
pub const SUBSCRIBE_RETRY: Duration = Duration::from_millis(200);

/// Distance from the bottom (pixels) still treated as "scrolled to bottom".
pub const SCROLL_BOTTOM_TOLERANCE_PX: f64 = 10.0;

// ============================================================================
// Server defaults
// ============================================================================

/// Default server base URL.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the thumbnail generation endpoint.
pub const THUMBNAIL_ENDPOINT_PATH: &str = "/tools/dataset-tagger/generate-thumbnail";

/// Default feed WebSocket URL.
pub const DEFAULT_FEED_URL: &str = "ws://127.0.0.1:8000/ws/app_manager";

/// Directory (inside the dataset folder) holding generated thumbnails.
pub const THUMBNAIL_DIR_NAME: &str = ".thumb";

/// Image extensions shown on the board (lowercase, without dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];
