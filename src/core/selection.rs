use crate::core::geo::TileCoord;
use crate::core::grid::TileGrid;
use crate::prelude::HashSet;

/// Modifier state accompanying a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionModifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl SelectionModifiers {
    pub const NONE: SelectionModifiers = SelectionModifiers {
        shift: false,
        ctrl: false,
    };

    /// Shift or Ctrl turn a click into a membership toggle
    pub fn toggles(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// Set of selected tiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionModel {
    tiles: HashSet<TileCoord>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles membership with a toggle modifier, otherwise selects only `coord`
    pub fn click(&mut self, coord: TileCoord, modifiers: SelectionModifiers) {
        if modifiers.toggles() {
            if !self.tiles.remove(&coord) {
                self.tiles.insert(coord);
            }
        } else {
            self.replace(coord);
        }
    }

    /// Replaces the whole selection with a single tile
    pub fn replace(&mut self, coord: TileCoord) {
        self.tiles.clear();
        self.tiles.insert(coord);
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.tiles.contains(coord)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> {
        self.tiles.iter()
    }

    /// Selected tile IDs in ascending order
    pub fn sorted_ids(&self, grid: &TileGrid) -> Vec<u32> {
        let mut ids: Vec<u32> = self.tiles.iter().map(|coord| grid.tile_id(*coord)).collect();
        ids.sort_unstable();
        ids
    }

    /// Comma separated ID list for the clipboard
    pub fn id_list(&self, grid: &TileGrid) -> String {
        self.sorted_ids(grid)
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
