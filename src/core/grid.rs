//! Static atlas geometry and the tile-ID addressing scheme.
//!
//! IDs are assigned down vertical bands of [`ADDRESS_BAND_COLS`] columns:
//! `id = (col % 16) + (col / 16) * 512 + row * 16`. The stride of 512 is the
//! size of one band on the reference 128x32 grid, so the formula is only a
//! bijection when a band holds exactly 512 tiles. Other layouts are rejected
//! at construction instead of guessing a generalised stride.

use crate::core::constants::{ADDRESS_BAND_COLS, TILESET_HEIGHT, TILESET_WIDTH, TILE_SIZE};
use crate::core::geo::TileCoord;
use crate::{Result, TileScopeError};

/// ID stride between consecutive column bands.
const BAND_STRIDE: u32 = 512;

/// Immutable grid geometry with a precomputed inverse of the addressing function
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    image_width: u32,
    image_height: u32,
    tile_size: u32,
    cols: u32,
    rows: u32,
    /// `by_id[id]` is the tile carrying that ID
    by_id: Vec<TileCoord>,
}

impl TileGrid {
    /// Creates a grid, validating the dimensions and the addressing bijection
    pub fn new(image_width: u32, image_height: u32, tile_size: u32) -> Result<Self> {
        if image_width == 0 || image_height == 0 || tile_size == 0 {
            return Err(TileScopeError::InvalidGrid(format!(
                "dimensions must be positive, got {}x{} with tile size {}",
                image_width, image_height, tile_size
            )));
        }
        if image_width % tile_size != 0 || image_height % tile_size != 0 {
            return Err(TileScopeError::InvalidGrid(format!(
                "{}x{} is not a multiple of tile size {}",
                image_width, image_height, tile_size
            )));
        }

        let cols = image_width / tile_size;
        let rows = image_height / tile_size;
        let total = (cols * rows) as usize;

        let mut slots: Vec<Option<TileCoord>> = vec![None; total];
        for row in 0..rows {
            for col in 0..cols {
                let id = address(col, row) as usize;
                match slots.get_mut(id) {
                    Some(slot @ None) => *slot = Some(TileCoord::new(col, row)),
                    _ => {
                        log::warn!("tile addressing collides or overflows on a {}x{} grid", cols, rows);
                        return Err(TileScopeError::UnsupportedAddressing { cols, rows });
                    }
                }
            }
        }
        // every slot is filled: total slots, total distinct in-range ids
        let by_id = slots.into_iter().flatten().collect();

        Ok(Self {
            image_width,
            image_height,
            tile_size,
            cols,
            rows,
            by_id,
        })
    }

    /// The 2048x512 atlas of 16x16 tiles
    pub fn reference() -> Self {
        Self::new(TILESET_WIDTH, TILESET_HEIGHT, TILE_SIZE)
            .expect("reference grid dimensions are valid")
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn total_tiles(&self) -> u32 {
        self.cols * self.rows
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.col < self.cols && coord.row < self.rows
    }

    /// Tile ID of a grid coordinate
    pub fn tile_id(&self, coord: TileCoord) -> u32 {
        address(coord.col, coord.row)
    }

    /// Inverse of [`tile_id`](Self::tile_id); `None` for IDs outside `[0, total)`
    pub fn tile_from_id(&self, id: i64) -> Option<TileCoord> {
        let index = usize::try_from(id).ok()?;
        self.by_id.get(index).copied()
    }

    /// Two-digit label drawn on a tile: the last two digits of its ID
    pub fn tile_label(&self, coord: TileCoord) -> String {
        format!("{:02}", self.tile_id(coord) % 100)
    }

    /// Top-left pixel of a tile in image space
    pub fn tile_origin(&self, coord: TileCoord) -> (u32, u32) {
        (coord.col * self.tile_size, coord.row * self.tile_size)
    }

    /// Iterates every tile in row-major order
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| TileCoord::new(col, row)))
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::reference()
    }
}

fn address(col: u32, row: u32) -> u32 {
    (col % ADDRESS_BAND_COLS) + (col / ADDRESS_BAND_COLS) * BAND_STRIDE + row * ADDRESS_BAND_COLS
}
