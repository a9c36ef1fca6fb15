//! `tagboard fit`: compute a grid layout without a host UI.

use clap::Args;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config;
use crate::error::TagboardError;
use crate::grid::{
    AspectRatio, ColumnTrack, GridLayout, GridSurface, Relayout, format_px, relayout,
};

/// Arguments of the `fit` command.
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Number of tiles to place.
    #[arg(long, short = 'n')]
    pub items: usize,

    /// Container width in pixels.
    #[arg(long, short = 'W', allow_negative_numbers = true)]
    pub width: f64,

    /// Container height in pixels.
    #[arg(long, short = 'H', allow_negative_numbers = true)]
    pub height: f64,

    /// Gap between tiles in pixels.
    #[arg(long, short, conflicts_with = "gap_style")]
    pub gap: Option<f64>,

    /// Gap as a CSS value (e.g. "10px"), parsed like a computed style.
    #[arg(long, value_name = "CSS")]
    pub gap_style: Option<String>,

    /// Tile aspect ratio (width/height), e.g. "2/3", "16:9" or "0.75".
    /// Defaults to the configured ratio.
    #[arg(long, short)]
    pub aspect: Option<AspectRatio>,

    /// Output as JSON.
    #[arg(long, short)]
    pub json: bool,
}

/// A surface that records the styles a browser grid would receive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssSurface {
    #[serde(skip)]
    width: f64,
    #[serde(skip)]
    height: f64,
    #[serde(skip)]
    gap: String,
    #[serde(skip)]
    tiles: usize,
    pub grid_template_columns: Option<String>,
    pub tile_width: Option<String>,
    pub tile_height: Option<String>,
}

impl CssSurface {
    #[must_use]
    pub fn new(width: f64, height: f64, gap: impl Into<String>, tiles: usize) -> Self {
        Self { width, height, gap: gap.into(), tiles, ..Self::default() }
    }

    /// CSS declarations for the container and the tiles.
    #[must_use]
    pub fn declarations(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(columns) = &self.grid_template_columns {
            lines.push(format!(".grid {{ grid-template-columns: {columns}; }}"));
        }
        match (&self.tile_width, &self.tile_height) {
            (Some(width), Some(height)) => {
                lines.push(format!(".tile {{ width: {width}; height: {height}; }}"));
            }
            _ => lines.push(".tile { width: auto; height: auto; }".to_string()),
        }
        lines
    }
}

impl GridSurface for CssSurface {
    fn container_size(&self) -> (f64, f64) { (self.width, self.height) }

    fn gap_style(&self) -> &str { &self.gap }

    fn tile_count(&self) -> usize { self.tiles }

    fn set_column_tracks(&mut self, columns: usize, track: ColumnTrack) {
        self.grid_template_columns = Some(track.template(columns));
    }

    fn set_tile_size(&mut self, width: f64, height: f64) {
        self.tile_width = Some(format_px(width));
        self.tile_height = Some(format_px(height));
    }

    fn clear_tile_size(&mut self) {
        self.tile_width = None;
        self.tile_height = None;
    }
}

#[derive(Serialize)]
struct FitReport<'a> {
    layout: Option<GridLayout>,
    css: &'a CssSurface,
}

#[derive(Tabled)]
struct LayoutRow {
    #[tabled(rename = "Columns")]
    columns: usize,
    #[tabled(rename = "Rows")]
    rows: String,
    #[tabled(rename = "Tile Width")]
    width: String,
    #[tabled(rename = "Tile Height")]
    height: String,
    #[tabled(rename = "Fallback")]
    fallback: String,
}

/// Runs the `fit` command.
///
/// # Errors
///
/// Returns [`TagboardError::LayoutError`] if the container has no usable size.
pub fn execute(args: &FitArgs) -> Result<(), TagboardError> {
    let aspect = args.aspect.unwrap_or_else(|| config::get_config().grid.aspect());
    let gap = match (&args.gap_style, args.gap) {
        (Some(style), _) => style.clone(),
        (None, Some(gap)) => format!("{gap}px"),
        (None, None) => String::new(),
    };

    let mut surface = CssSurface::new(args.width, args.height, gap, args.items);
    let layout = match relayout(&mut surface, aspect.get())? {
        Relayout::Applied(layout) => Some(layout),
        Relayout::Skipped => None,
    };

    if args.json {
        output::print_json(&FitReport { layout, css: &surface });
        return Ok(());
    }

    let Some(layout) = layout else {
        println!("No tiles to lay out.");
        return Ok(());
    };

    let row = match layout {
        GridLayout::Sized(tile) => LayoutRow {
            columns: tile.columns,
            rows: tile.rows.to_string(),
            width: format_px(tile.item_width),
            height: format_px(tile.item_height),
            fallback: output::format_bool(false),
        },
        GridLayout::Fallback { columns } => LayoutRow {
            columns,
            rows: "-".to_string(),
            width: "1fr".to_string(),
            height: "auto".to_string(),
            fallback: output::format_bool(true),
        },
    };

    let table = Table::new([row])
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..4)).with(Alignment::right()))
        .with(Modify::new(Columns::last()).with(Alignment::center()))
        .to_string();
    println!("{table}\n");

    for line in surface.declarations() {
        println!("{line}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_surface_sized_layout() {
        let mut surface = CssSurface::new(1000.0, 800.0, "10px", 12);
        let result = relayout(&mut surface, 2.0 / 3.0).unwrap();

        assert!(matches!(result, Relayout::Applied(GridLayout::Sized(_))));
        let columns = surface.grid_template_columns.clone().unwrap();
        assert!(columns.starts_with("repeat("));
        assert!(columns.ends_with("px)"));
        assert!(surface.tile_width.is_some());
        assert_eq!(surface.declarations().len(), 2);
    }

    #[test]
    fn test_css_surface_fallback_clears_tile_size() {
        let mut surface = CssSurface::new(1.0, 1.0, "10px", 100);
        surface.tile_width = Some("5.00px".to_string());
        surface.tile_height = Some("5.00px".to_string());

        let result = relayout(&mut surface, 1.0).unwrap();

        assert_eq!(result, Relayout::Applied(GridLayout::Fallback { columns: 10 }));
        assert_eq!(surface.grid_template_columns.as_deref(), Some("repeat(10, 1fr)"));
        assert!(surface.tile_width.is_none());
        assert!(surface.declarations()[1].contains("auto"));
    }

    #[test]
    fn test_css_surface_no_tiles() {
        let mut surface = CssSurface::new(1000.0, 800.0, "", 0);
        assert_eq!(relayout(&mut surface, 1.0).unwrap(), Relayout::Skipped);
        assert!(surface.grid_template_columns.is_none());
    }

    #[test]
    fn test_execute_rejects_invalid_container() {
        let args = FitArgs {
            items: 3,
            width: 0.0,
            height: 100.0,
            gap: None,
            gap_style: None,
            aspect: Some(AspectRatio::default()),
            json: true,
        };
        assert!(matches!(execute(&args), Err(TagboardError::LayoutError(_))));
    }
}
