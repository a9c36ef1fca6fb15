//! Host surface interface and relayout.
//!
//! A [`GridSurface`] is whatever renders the board: a browser bridge, a
//! native widget, or a test double. [`relayout`] queries it, runs the fitter,
//! and writes the result back.

use std::fmt;
use std::num::NonZeroUsize;

use super::{GridFitError, GridLayout, LayoutRequest, fit};
use crate::constants::FALLBACK_GAP_PX;

/// Width of each grid column track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnTrack {
    /// Fixed pixel width.
    Fixed(f64),
    /// Equal share of the remaining space (`1fr`).
    Fraction,
}

impl ColumnTrack {
    /// Renders the `grid-template-columns` value for `columns` tracks.
    #[must_use]
    pub fn template(self, columns: usize) -> String {
        match self {
            Self::Fixed(width) => format!("repeat({columns}, {})", format_px(width)),
            Self::Fraction => format!("repeat({columns}, 1fr)"),
        }
    }
}

impl fmt::Display for ColumnTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(width) => f.write_str(&format_px(*width)),
            Self::Fraction => f.write_str("1fr"),
        }
    }
}

/// Formats a pixel length with two decimals (`"163.33px"`).
#[must_use]
pub fn format_px(value: f64) -> String { format!("{value:.2}px") }

/// Parses a CSS `gap` value into pixels.
///
/// Reads the leading number the way `parseFloat` does (`"10px"` → 10,
/// `"4.5px 8px"` → 4.5). Values that are missing, unparseable, non-finite or
/// zero fall back to 0.3 px.
#[must_use]
pub fn parse_gap(style: &str) -> f64 {
    let trimmed = style.trim_start();
    let end = leading_number_len(trimmed);

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|gap| gap.is_finite() && *gap != 0.0)
        .unwrap_or(FALLBACK_GAP_PX)
}

/// Length of the longest numeric prefix (sign, digits, one dot, exponent).
fn leading_number_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut idx = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let mut seen_dot = false;
    let mut seen_digit = false;
    while let Some(&b) = bytes.get(idx) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        idx += 1;
    }

    if !seen_digit {
        return 0;
    }

    // Optional exponent, only if followed by at least one digit.
    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                exp += 1;
            }
            idx = exp;
        }
    }

    idx
}

/// The rendering side of the board grid.
pub trait GridSurface {
    /// Current pixel size of the grid container as `(width, height)`.
    fn container_size(&self) -> (f64, f64);

    /// Computed CSS `gap` of the grid (e.g. `"10px"`).
    fn gap_style(&self) -> &str;

    /// Number of tiles currently in the grid.
    fn tile_count(&self) -> usize;

    /// Sets the column count and the width of each column track.
    fn set_column_tracks(&mut self, columns: usize, track: ColumnTrack);

    /// Gives every tile an explicit pixel size.
    fn set_tile_size(&mut self, width: f64, height: f64);

    /// Removes explicit tile sizing so tiles follow the column tracks.
    fn clear_tile_size(&mut self);
}

/// What a relayout did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relayout {
    /// The grid has no tiles; nothing was touched.
    Skipped,
    /// The layout was computed and applied.
    Applied(GridLayout),
}

/// Recomputes and applies the grid layout of a surface.
///
/// # Errors
///
/// Returns [`GridFitError::InvalidContainerDimensions`] if the container has
/// no usable size; the surface is left untouched in that case.
pub fn relayout<S>(surface: &mut S, aspect_ratio: f64) -> Result<Relayout, GridFitError>
where S: GridSurface + ?Sized {
    let Some(item_count) = NonZeroUsize::new(surface.tile_count()) else {
        tracing::trace!("grid has no tiles, skipping relayout");
        return Ok(Relayout::Skipped);
    };

    let (width, height) = surface.container_size();
    let gap = parse_gap(surface.gap_style());
    let request = LayoutRequest::new(item_count, width, height, gap, aspect_ratio);

    let layout = fit(&request)?;
    apply(surface, &layout);

    tracing::debug!(
        items = item_count.get(),
        width,
        height,
        gap,
        columns = layout.columns(),
        fallback = layout.is_fallback(),
        "grid relayout applied"
    );

    Ok(Relayout::Applied(layout))
}

/// Writes a computed layout to the surface.
fn apply<S>(surface: &mut S, layout: &GridLayout)
where S: GridSurface + ?Sized {
    match layout {
        GridLayout::Sized(tile) => {
            surface.set_column_tracks(tile.columns, ColumnTrack::Fixed(tile.item_width));
            surface.set_tile_size(tile.item_width, tile.item_height);
        }
        GridLayout::Fallback { columns } => {
            surface.set_column_tracks(*columns, ColumnTrack::Fraction);
            surface.clear_tile_size();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory surface recording what was applied.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub width: f64,
        pub height: f64,
        pub gap: String,
        pub tiles: usize,
        pub tracks: Option<(usize, ColumnTrack)>,
        pub tile_size: Option<(f64, f64)>,
        pub cleared: usize,
        pub applied: usize,
    }

    impl RecordingSurface {
        pub fn new(width: f64, height: f64, gap: &str, tiles: usize) -> Self {
            Self {
                width,
                height,
                gap: gap.to_string(),
                tiles,
                ..Default::default()
            }
        }
    }

    impl GridSurface for RecordingSurface {
        fn container_size(&self) -> (f64, f64) { (self.width, self.height) }

        fn gap_style(&self) -> &str { &self.gap }

        fn tile_count(&self) -> usize { self.tiles }

        fn set_column_tracks(&mut self, columns: usize, track: ColumnTrack) {
            self.tracks = Some((columns, track));
            self.applied += 1;
        }

        fn set_tile_size(&mut self, width: f64, height: f64) {
            self.tile_size = Some((width, height));
        }

        fn clear_tile_size(&mut self) {
            self.tile_size = None;
            self.cleared += 1;
        }
    }

    #[test]
    fn test_parse_gap_pixels() {
        assert!((parse_gap("10px") - 10.0).abs() < f64::EPSILON);
        assert!((parse_gap("  4.5px 8px") - 4.5).abs() < f64::EPSILON);
        assert!((parse_gap("1e1px") - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_gap_falls_back() {
        for style in ["", "normal", "0px", "0", "px", "."] {
            assert!(
                (parse_gap(style) - FALLBACK_GAP_PX).abs() < f64::EPSILON,
                "style {style:?} should fall back"
            );
        }
    }

    #[test]
    fn test_parse_gap_ignores_dangling_exponent() {
        assert!((parse_gap("3em") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_column_track_templates() {
        assert_eq!(ColumnTrack::Fixed(163.333_333).template(5), "repeat(5, 163.33px)");
        assert_eq!(ColumnTrack::Fraction.template(3), "repeat(3, 1fr)");
        assert_eq!(ColumnTrack::Fraction.to_string(), "1fr");
    }

    #[test]
    fn test_relayout_applies_sized_layout() {
        let mut surface = RecordingSurface::new(1000.0, 500.0, "10px", 10);
        let result = relayout(&mut surface, 2.0 / 3.0).unwrap();

        let Relayout::Applied(GridLayout::Sized(tile)) = result else {
            panic!("expected a sized layout, got {result:?}");
        };
        assert_eq!(surface.tracks, Some((5, ColumnTrack::Fixed(tile.item_width))));
        assert_eq!(surface.tile_size, Some((tile.item_width, tile.item_height)));
        assert_eq!(surface.cleared, 0);
    }

    #[test]
    fn test_relayout_fallback_clears_sizing() {
        let mut surface = RecordingSurface::new(100.0, 100.0, "500px", 10);
        surface.tile_size = Some((1.0, 1.0));

        let result = relayout(&mut surface, 1.0).unwrap();

        assert_eq!(result, Relayout::Applied(GridLayout::Fallback { columns: 3 }));
        assert_eq!(surface.tracks, Some((3, ColumnTrack::Fraction)));
        assert_eq!(surface.tile_size, None);
        assert_eq!(surface.cleared, 1);
    }

    #[test]
    fn test_relayout_skips_empty_grid() {
        let mut surface = RecordingSurface::new(1000.0, 500.0, "10px", 0);
        assert_eq!(relayout(&mut surface, 1.0).unwrap(), Relayout::Skipped);
        assert_eq!(surface.applied, 0);
    }

    #[test]
    fn test_relayout_invalid_container_leaves_surface_untouched() {
        let mut surface = RecordingSurface::new(0.0, 500.0, "10px", 4);
        surface.tracks = Some((2, ColumnTrack::Fraction));

        let err = relayout(&mut surface, 1.0).unwrap_err();

        assert!(matches!(err, GridFitError::InvalidContainerDimensions { .. }));
        assert_eq!(surface.tracks, Some((2, ColumnTrack::Fraction)));
        assert_eq!(surface.applied, 0);
    }
}
