//! Already-parsed viewer settings
//!
//! The configuration collaborator owns the settings file; the engine only
//! consumes these values. Every section is `#[serde(default)]` so a partial
//! document deserializes with the remaining values filled in.

use crate::core::constants::{
    DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH,
    MAX_SURFACE_DIM, MIN_SCREEN_HEIGHT, MIN_SCREEN_WIDTH, PANEL_HEIGHT,
};
use serde::{Deserialize, Serialize};

/// RGBA color, serialized as a 3- or 4-element array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ColorRepr", into = "ColorRepr")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::rgba(r, g, b, a)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl From<ColorRepr> for Color {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Rgb([r, g, b]) => Color::rgb(r, g, b),
            ColorRepr::Rgba([r, g, b, a]) => Color::rgba(r, g, b, a),
        }
    }
}

impl From<Color> for ColorRepr {
    fn from(color: Color) -> Self {
        if color.a == 255 {
            ColorRepr::Rgb([color.r, color.g, color.b])
        } else {
            ColorRepr::Rgba([color.r, color.g, color.b, color.a])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TileScopeConfig {
    pub colors: ColorConfig,
    pub toggles: ToggleConfig,
    pub labels: LabelConfig,
    pub view: ViewConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Background of the tile viewing area
    pub background: Color,
    pub grid: Color,
    /// Dimming overlay drawn over the atlas
    pub overlay: Color,
    pub tile_number_text: Color,
    pub tooltip_text: Color,
    pub tile_hover: Color,
    pub tile_select: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(25, 30, 40),
            grid: Color::rgb(60, 70, 90),
            overlay: Color::rgba(0, 0, 0, 70),
            tile_number_text: Color::rgb(220, 220, 220),
            tooltip_text: Color::rgb(230, 230, 230),
            tile_hover: Color::rgba(255, 215, 0, 128),
            tile_select: Color::rgba(50, 200, 50, 128),
        }
    }
}

/// Startup values of the display toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    pub show_background_overlay: bool,
    pub show_grid: bool,
    pub show_numbers: bool,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            show_background_overlay: true,
            show_grid: true,
            show_numbers: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label size at zoom 1.0
    pub reference_font_size: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            reference_font_size: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_surface_dim: u32,
    pub panel_height: f64,
    pub min_screen_width: f64,
    pub min_screen_height: f64,
    pub initial_screen_width: f64,
    pub initial_screen_height: f64,
}

impl ViewConfig {
    /// Zoom bounds in ascending order, whatever order they were supplied in
    pub fn zoom_bounds(&self) -> (f64, f64) {
        if self.min_zoom <= self.max_zoom {
            (self.min_zoom, self.max_zoom)
        } else {
            (self.max_zoom, self.min_zoom)
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            max_surface_dim: MAX_SURFACE_DIM,
            panel_height: PANEL_HEIGHT,
            min_screen_width: MIN_SCREEN_WIDTH,
            min_screen_height: MIN_SCREEN_HEIGHT,
            initial_screen_width: DEFAULT_SCREEN_WIDTH,
            initial_screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Extension without the dot: png, jpg or bmp
    pub default_format: String,
    /// Directory offered first by the save dialog, "." for the working directory
    pub default_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "png".to_string(),
            default_path: ".".to_string(),
        }
    }
}
