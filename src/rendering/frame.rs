//! Per-frame draw plan.
//!
//! The plan is pure data in screen pixels: where the scaled atlas goes, which
//! grid lines, labels and highlights to draw. It is built from scope state
//! every tick and is bounded by the visible tile range, so its size follows
//! what is on screen rather than the grid size.

use crate::core::config::{LabelConfig, ToggleConfig};
use crate::core::constants::{MAX_LABEL_SIZE, MIN_LABEL_SIZE};
use crate::core::geo::TileCoord;
use crate::core::grid::TileGrid;
use crate::core::selection::SelectionModel;
use crate::core::viewport::Viewport;
use crate::spatial::culling::{TileRange, VisibilityCuller};

/// One-pixel line between two inclusive screen endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl LineSegment {
    pub fn is_vertical(&self) -> bool {
        self.x0 == self.x1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLabel {
    pub text: String,
    pub center_x: i64,
    pub center_y: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Screen position of the scaled atlas' top-left corner
    pub image_origin: (i64, i64),
    pub show_overlay: bool,
    pub visible: TileRange,
    pub grid_lines: Vec<LineSegment>,
    pub labels: Vec<TileLabel>,
    /// Label height in pixels, already clamped
    pub label_size: u32,
    /// Screen origins of visible selected tiles, row-major
    pub selected: Vec<(i64, i64)>,
    pub hover: Option<(i64, i64)>,
}

impl FramePlan {
    pub fn build(
        grid: &TileGrid,
        viewport: &Viewport,
        selection: &SelectionModel,
        hover: Option<TileCoord>,
        toggles: &ToggleConfig,
        labels: &LabelConfig,
    ) -> Self {
        let visible = VisibilityCuller::visible_range(viewport);
        let offset = viewport.offset();
        let zoom = viewport.effective_zoom();
        let tile = viewport.screen_tile_size();
        let tile_px = tile.round();
        let (scaled_w, scaled_h) = viewport.scaled_size();
        let view_height = viewport.view_height();
        let screen_width = viewport.screen_width();

        let mut grid_lines = Vec::new();
        if toggles.show_grid && tile_px > 1.0 {
            let top = offset.y.max(0.0).round() as i64;
            let bottom = (offset.y + scaled_h).min(view_height).round() as i64;
            for col in visible.start_col..=visible.end_col {
                let x = (offset.x + col as f64 * tile).round();
                if top < bottom && x >= -1.0 && x <= screen_width + 1.0 {
                    let x = x as i64;
                    grid_lines.push(LineSegment { x0: x, y0: top, x1: x, y1: bottom });
                }
            }

            let left = offset.x.max(0.0).round() as i64;
            let right = (offset.x + scaled_w).min(screen_width).round() as i64;
            for row in visible.start_row..=visible.end_row {
                let y = (offset.y + row as f64 * tile).round();
                if left < right && y >= -1.0 && y <= view_height + 1.0 {
                    let y = y as i64;
                    grid_lines.push(LineSegment { x0: left, y0: y, x1: right, y1: y });
                }
            }
        }

        let label_size = label_size_for(labels.reference_font_size, zoom);
        let mut tile_labels = Vec::new();
        if toggles.show_numbers && tile_px >= 4.0 {
            tile_labels.reserve(visible.len());
            for coord in visible.iter() {
                tile_labels.push(TileLabel {
                    text: grid.tile_label(coord),
                    center_x: (offset.x + (coord.col as f64 + 0.5) * tile).round() as i64,
                    center_y: (offset.y + (coord.row as f64 + 0.5) * tile).round() as i64,
                });
            }
        }

        let screen_origin = |coord: TileCoord| viewport.tile_screen_origin(coord).round();

        let mut selected_coords: Vec<TileCoord> = if tile_px >= 1.0 {
            selection
                .iter()
                .copied()
                .filter(|coord| visible.contains(coord))
                .collect()
        } else {
            Vec::new()
        };
        selected_coords.sort_unstable_by_key(|coord| (coord.row, coord.col));

        Self {
            image_origin: offset.round(),
            show_overlay: toggles.show_background_overlay,
            visible,
            grid_lines,
            labels: tile_labels,
            label_size,
            selected: selected_coords.into_iter().map(screen_origin).collect(),
            hover: hover
                .filter(|coord| grid.contains(*coord) && tile_px >= 1.0)
                .map(screen_origin),
        }
    }
}

/// Label size for the given zoom, clamped to the readable range
pub fn label_size_for(reference_size: u32, zoom: f64) -> u32 {
    let size = (reference_size as f64 * zoom).max(0.0) as u32;
    size.clamp(MIN_LABEL_SIZE, MAX_LABEL_SIZE)
}
