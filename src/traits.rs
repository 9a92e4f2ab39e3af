//! Seams to the collaborators the engine does not implement itself
//!
//! Image codecs and native dialogs live outside the engine. They are reached
//! through these synchronous traits so the frame loop can treat them as
//! blocking modal calls.

use crate::Result;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Decodes and encodes raster files
pub trait ImageStore {
    /// Loads and decodes an image file
    fn load_image(&self, path: &Path) -> Result<RgbaImage>;

    /// Encodes `image` to `path`, choosing the format from the extension
    fn save_image(&self, path: &Path, image: &RgbaImage) -> Result<()>;
}

/// Modal dialogs the engine may ask for
#[derive(Debug, Clone, PartialEq)]
pub enum DialogKind {
    /// Pick an image to open
    OpenImage { initial_dir: PathBuf },
    /// Pick where to save the export
    SaveExport {
        initial_dir: PathBuf,
        suggested_name: String,
    },
    /// Ask for a tile ID as free text
    SearchTile { prompt: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogResponse {
    Path(PathBuf),
    Text(String),
}

/// Shows modal dialogs; `None` means the user cancelled
pub trait DialogProvider {
    fn show_dialog(&mut self, kind: DialogKind) -> Option<DialogResponse>;
}
