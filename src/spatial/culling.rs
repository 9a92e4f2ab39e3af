use crate::core::constants::VISIBLE_TILE_BUFFER;
use crate::core::geo::TileCoord;
use crate::core::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Half-open tile-index rectangle `[start_col, end_col) x [start_row, end_row)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileRange {
    pub start_col: u32,
    pub end_col: u32,
    pub start_row: u32,
    pub end_row: u32,
}

impl TileRange {
    pub fn contains(&self, coord: &TileCoord) -> bool {
        coord.col >= self.start_col
            && coord.col < self.end_col
            && coord.row >= self.start_row
            && coord.row < self.end_row
    }

    pub fn is_empty(&self) -> bool {
        self.start_col >= self.end_col || self.start_row >= self.end_row
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        ((self.end_col - self.start_col) * (self.end_row - self.start_row)) as usize
    }

    /// Tiles in the range, row-major
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> {
        let (cols, rows) = (self.start_col..self.end_col, self.start_row..self.end_row);
        rows.flat_map(move |row| cols.clone().map(move |col| TileCoord::new(col, row)))
    }
}

/// Screen-space culling of the tile grid.
///
/// Bounds per-frame grid, label and highlight work to the tiles that can
/// intersect the viewing area, so cost follows the visible tile count rather
/// than the grid size.
pub struct VisibilityCuller;

impl VisibilityCuller {
    /// Visible tile range for the current viewport, clamped to the grid
    pub fn visible_range(viewport: &Viewport) -> TileRange {
        let bounds = viewport.visible_image_bounds();
        let tile = viewport.tile_size() as f64;
        let (image_w, image_h) = viewport.image_size();
        let cols = image_w / viewport.tile_size();
        let rows = image_h / viewport.tile_size();

        let start_col = to_index((bounds.min.x / tile).floor()).min(cols);
        let start_row = to_index((bounds.min.y / tile).floor()).min(rows);
        let end_col = to_index((bounds.max.x / tile).floor())
            .saturating_add(VISIBLE_TILE_BUFFER)
            .min(cols);
        let end_row = to_index((bounds.max.y / tile).floor())
            .saturating_add(VISIBLE_TILE_BUFFER)
            .min(rows);

        TileRange {
            start_col,
            end_col: end_col.max(start_col),
            start_row,
            end_row: end_row.max(start_row),
        }
    }
}

/// Negative and non-finite indices collapse to 0; huge ones saturate.
fn to_index(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewConfig;
    use crate::core::grid::TileGrid;

    fn reference_viewport() -> Viewport {
        Viewport::new(&TileGrid::reference(), &ViewConfig::default())
    }

    #[test]
    fn test_visible_range_at_default_view() {
        let viewport = reference_viewport();
        let range = VisibilityCuller::visible_range(&viewport);

        // 1000 px wide at offset 0: columns 0..62 plus the buffer
        assert_eq!(range.start_col, 0);
        assert_eq!(range.end_col, 64);
        // the whole atlas height is visible
        assert_eq!(range.start_row, 0);
        assert_eq!(range.end_row, 32);
    }

    #[test]
    fn test_visible_range_when_zoomed_in() {
        let mut viewport = reference_viewport();
        viewport.set_zoom(4.0);
        viewport.pan(-2000.0, -300.0);

        let range = VisibilityCuller::visible_range(&viewport);
        // image x from 500 to 750, y from 75 to 228.75
        assert_eq!((range.start_col, range.end_col), (31, 48));
        assert_eq!((range.start_row, range.end_row), (4, 16));
        assert_eq!(range.len(), 17 * 12);
    }

    #[test]
    fn test_visible_range_stays_within_grid() {
        let mut viewport = reference_viewport();
        viewport.set_zoom(0.05);

        let range = VisibilityCuller::visible_range(&viewport);
        assert_eq!(range, TileRange { start_col: 0, end_col: 128, start_row: 0, end_row: 32 });
    }

    #[test]
    fn test_range_iteration_and_contains() {
        let range = TileRange { start_col: 2, end_col: 4, start_row: 1, end_row: 2 };

        let tiles: Vec<_> = range.iter().collect();
        assert_eq!(tiles, vec![TileCoord::new(2, 1), TileCoord::new(3, 1)]);
        assert!(range.contains(&TileCoord::new(3, 1)));
        assert!(!range.contains(&TileCoord::new(4, 1)));
        assert!(TileRange::default().is_empty());
    }
}
