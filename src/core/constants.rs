//! Engine-wide constants for the reference atlas and its viewer.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Width of the reference atlas in pixels.
pub const TILESET_WIDTH: u32 = 2048;

/// Height of the reference atlas in pixels.
pub const TILESET_HEIGHT: u32 = 512;

/// Square tile size in pixels.
pub const TILE_SIZE: u32 = 16;

/// Columns in one addressing band; IDs run down a band before moving right.
pub const ADDRESS_BAND_COLS: u32 = 16;

/// Largest dimension the physically rescaled atlas may have.
pub const MAX_SURFACE_DIM: u32 = 8192;

pub const DEFAULT_MIN_ZOOM: f64 = 0.05;
pub const DEFAULT_MAX_ZOOM: f64 = 4.0;

/// Zoom changes smaller than this are treated as no-ops.
pub const ZOOM_EPSILON: f64 = 1e-6;

/// Effective zooms below this are replaced by 1.0 in divisions.
pub const MIN_SAFE_ZOOM: f64 = 1e-6;

/// Extra tiles past the visible end bounds, for partially visible edges.
pub const VISIBLE_TILE_BUFFER: u32 = 2;

/// Height of the button panel that covers the bottom of the window.
pub const PANEL_HEIGHT: f64 = 85.0;

pub const MIN_SCREEN_WIDTH: f64 = 600.0;
pub const MIN_SCREEN_HEIGHT: f64 = 400.0;

pub const DEFAULT_SCREEN_WIDTH: f64 = 1000.0;
pub const DEFAULT_SCREEN_HEIGHT: f64 = 700.0;

/// Zoom applied by a tile search when the view is further out.
pub const SEARCH_MIN_ZOOM: f64 = 2.0;

/// Button / keyboard zoom step.
pub const KEY_ZOOM_STEP: f64 = 1.2;

/// Mouse wheel zoom factors.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Export progress is reported once per this many tiles.
pub const EXPORT_PROGRESS_INTERVAL: usize = 100;

/// How long a status message stays visible, in milliseconds.
pub const STATUS_MESSAGE_MS: u64 = 2500;

/// Bounds for the on-screen tile label size.
pub const MIN_LABEL_SIZE: u32 = 4;
pub const MAX_LABEL_SIZE: u32 = 40;
