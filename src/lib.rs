//! # TileScope
//!
//! Viewport, tile addressing and render-cache engine for a fixed-size tile
//! atlas (2048x512 pixels of 16x16 tiles by default).
//!
//! The engine maps between screen pixels, a pan/zoom camera and tile grid
//! coordinates, keeps the derived render artifacts (scaled atlas, highlight
//! tiles, dimming overlay) in step with the effective zoom, and composites the
//! full atlas for export. Windowing, dialogs, clipboard, configuration files
//! and image codecs are left to collaborators reached through [`traits`].

pub mod core;
pub mod export;
pub mod input;
pub mod rendering;
pub mod spatial;
pub mod tiles;
pub mod traits;

pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::TileScopeConfig,
    geo::{Point, TileCoord},
    grid::TileGrid,
    scope::TileScope,
    selection::{SelectionModel, SelectionModifiers},
    viewport::Viewport,
};

pub use export::pipeline::{ExportOutcome, ExportPipeline};
pub use input::{
    events::InputEvent,
    handler::{Action, InputHandler},
};
pub use rendering::cache::RenderCache;
pub use spatial::culling::{TileRange, VisibilityCuller};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TileScopeError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum TileScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Tile addressing is not a bijection for a {cols}x{rows} grid")]
    UnsupportedAddressing { cols: u32, rows: u32 },

    #[error("Tile ID {0} not found or invalid")]
    TileNotFound(i64),

    #[error("Invalid tile ID format: {0:?}")]
    InvalidTileId(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Error type alias for convenience
pub type Error = TileScopeError;
