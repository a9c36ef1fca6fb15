//! Tile grid layout for the image board.
//!
//! The board shows every image as an equally sized tile with a fixed aspect
//! ratio. This module picks the column count that makes those tiles as large
//! as possible while the whole grid still fits its container, and applies the
//! result to a host surface.
//!
//! # Components
//!
//! - [`fit`] / [`fit_with_cap`]: the pure best-fit search
//! - [`GridSurface`] / [`relayout`]: the host-side query and command interface
//! - [`GridController`]: maps mount, resize and content triggers to relayouts

mod controller;
mod fitter;
mod surface;

use std::num::NonZeroUsize;
use std::str::FromStr;

pub use controller::{GridController, GridTiming, LayoutTrigger};
pub use fitter::{fit, fit_with_cap};
use serde::Serialize;
pub use surface::{ColumnTrack, GridSurface, Relayout, format_px, parse_gap, relayout};

// ============================================================================
// Request / Result
// ============================================================================

/// Input of one layout computation.
///
/// Built fresh on every trigger and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    /// Number of tiles to place.
    pub item_count: NonZeroUsize,
    /// Available width in pixels.
    pub container_width: f64,
    /// Available height in pixels.
    pub container_height: f64,
    /// Spacing between tiles, identical on both axes.
    pub gap: f64,
    /// Width divided by height of every tile.
    pub aspect_ratio: f64,
}

impl LayoutRequest {
    /// Creates a new layout request.
    #[must_use]
    pub const fn new(
        item_count: NonZeroUsize,
        container_width: f64,
        container_height: f64,
        gap: f64,
        aspect_ratio: f64,
    ) -> Self {
        Self {
            item_count,
            container_width,
            container_height,
            gap,
            aspect_ratio,
        }
    }
}

/// A sized grid arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayout {
    pub columns: usize,
    pub rows: usize,
    pub item_width: f64,
    pub item_height: f64,
    /// `item_width * item_height`, the maximized objective.
    pub area: f64,
}

impl TileLayout {
    /// Total width occupied by the grid, gaps included.
    #[allow(clippy::cast_precision_loss, clippy::suboptimal_flops)]
    #[must_use]
    pub fn total_width(&self, gap: f64) -> f64 {
        let columns = self.columns as f64;
        columns * self.item_width + (columns - 1.0) * gap
    }

    /// Total height occupied by the grid, gaps included.
    #[allow(clippy::cast_precision_loss, clippy::suboptimal_flops)]
    #[must_use]
    pub fn total_height(&self, gap: f64) -> f64 {
        let rows = self.rows as f64;
        rows * self.item_height + (rows - 1.0) * gap
    }
}

/// Outcome of a successful fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridLayout {
    /// Tiles get an explicit size.
    Sized(TileLayout),
    /// No candidate fit; tiles share the space evenly and must not be scaled.
    Fallback { columns: usize },
}

impl GridLayout {
    /// Number of columns of this layout.
    #[must_use]
    pub const fn columns(&self) -> usize {
        match self {
            Self::Sized(layout) => layout.columns,
            Self::Fallback { columns } => *columns,
        }
    }

    /// Returns the sized layout, if any.
    #[must_use]
    pub const fn sized(&self) -> Option<&TileLayout> {
        match self {
            Self::Sized(layout) => Some(layout),
            Self::Fallback { .. } => None,
        }
    }

    /// Returns `true` for the degenerate fallback layout.
    #[must_use]
    pub const fn is_fallback(&self) -> bool { matches!(self, Self::Fallback { .. }) }
}

/// Errors reported by the grid fitter.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GridFitError {
    /// The container has a zero, negative or non-numeric size.
    #[error("Invalid container dimensions: {width}x{height}")]
    InvalidContainerDimensions { width: f64, height: f64 },
}

// ============================================================================
// Aspect Ratio
// ============================================================================

/// A positive, finite tile aspect ratio (width / height).
///
/// Parses either a ratio (`"2/3"`, `"16:9"`) or a decimal (`"0.75"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// Creates an aspect ratio, rejecting non-positive or non-finite values.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Returns the ratio as a float.
    #[must_use]
    pub const fn get(self) -> f64 { self.0 }
}

impl Default for AspectRatio {
    fn default() -> Self { Self(crate::constants::DEFAULT_ASPECT_RATIO) }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = match s.split_once(['/', ':']) {
            Some((width, height)) => {
                let width: f64 = width.trim().parse().map_err(|_| format!("Invalid width in '{s}'"))?;
                let height: f64 =
                    height.trim().parse().map_err(|_| format!("Invalid height in '{s}'"))?;
                width / height
            }
            None => s.parse().map_err(|_| format!("Invalid aspect ratio '{s}'"))?,
        };

        Self::new(value).ok_or_else(|| format!("Aspect ratio must be positive: '{s}'"))
    }
}
