//! Best-fit tile grid search.
//!
//! Tries every column count from 1 up to a small cap and keeps the one that
//! yields the largest tile area while the grid fits both axes of the
//! container. For each candidate the tile is first sized to fill the width;
//! if the resulting rows overflow the height, height becomes the binding
//! constraint and width follows from the aspect ratio.
//!
//! The arithmetic avoids fused multiply-add so every host computing the same
//! search gets bit-identical sizes.

#![allow(clippy::suboptimal_flops)]

use super::{GridFitError, GridLayout, LayoutRequest, TileLayout};
use crate::constants::{MAX_COLUMNS_TO_TRY, MIN_TILE_EDGE_PX, WIDTH_TOLERANCE_PX};

/// Computes the best grid layout for a request.
///
/// The search tries `min(item_count, 40)` column counts.
///
/// # Errors
///
/// Returns [`GridFitError::InvalidContainerDimensions`] if the container width
/// or height is not strictly positive.
pub fn fit(request: &LayoutRequest) -> Result<GridLayout, GridFitError> {
    let cap = request.item_count.get().min(MAX_COLUMNS_TO_TRY);
    fit_with_cap(request, cap)
}

/// Computes the best grid layout trying column counts `1..=max_columns_to_try`.
///
/// The cap is clamped to the item count: more columns than items can never
/// improve the area.
///
/// # Errors
///
/// Returns [`GridFitError::InvalidContainerDimensions`] if the container width
/// or height is not strictly positive.
#[allow(clippy::cast_precision_loss)]
pub fn fit_with_cap(
    request: &LayoutRequest,
    max_columns_to_try: usize,
) -> Result<GridLayout, GridFitError> {
    let LayoutRequest {
        item_count,
        container_width,
        container_height,
        gap,
        aspect_ratio,
    } = *request;

    // Negated comparison so NaN is rejected as well.
    if !(container_width > 0.0 && container_height > 0.0) {
        return Err(GridFitError::InvalidContainerDimensions {
            width: container_width,
            height: container_height,
        });
    }

    let item_count = item_count.get();
    let max_columns = max_columns_to_try.min(item_count);

    let mut best: Option<TileLayout> = None;

    for columns in 1..=max_columns {
        let rows = item_count.div_ceil(columns);
        let (cols_f, rows_f) = (columns as f64, rows as f64);

        let mut item_width = (container_width - (cols_f - 1.0) * gap) / cols_f;
        let mut item_height = item_width / aspect_ratio;

        let total_height = rows_f * item_height + (rows_f - 1.0) * gap;
        if total_height > container_height {
            item_height = (container_height - (rows_f - 1.0) * gap) / rows_f;
            item_width = item_height * aspect_ratio;
        }

        if item_width <= MIN_TILE_EDGE_PX || item_height <= MIN_TILE_EDGE_PX {
            continue;
        }

        let total_width = cols_f * item_width + (cols_f - 1.0) * gap;
        if total_width > container_width + WIDTH_TOLERANCE_PX {
            continue;
        }

        let area = item_width * item_height;
        let best_area = best.map_or(0.0, |layout| layout.area);
        if area > best_area {
            best = Some(TileLayout {
                columns,
                rows,
                item_width,
                item_height,
                area,
            });
        }
    }

    match best {
        Some(layout)
            if layout.columns > 0
                && layout.item_width > MIN_TILE_EDGE_PX
                && layout.item_height > MIN_TILE_EDGE_PX =>
        {
            tracing::trace!(
                columns = layout.columns,
                rows = layout.rows,
                item_width = layout.item_width,
                item_height = layout.item_height,
                "grid fit found"
            );
            Ok(GridLayout::Sized(layout))
        }
        _ => {
            let columns = fallback_columns(item_count);
            tracing::debug!(item_count, columns, "no grid candidate fits, using fallback");
            Ok(GridLayout::Fallback { columns })
        }
    }
}

/// Column count of the even fallback layout: `max(1, floor(sqrt(n)))`.
#[must_use]
pub const fn fallback_columns(item_count: usize) -> usize {
    let root = item_count.isqrt();
    if root == 0 { 1 } else { root }
}
