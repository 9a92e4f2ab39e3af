use crate::core::grid::TileGrid;
use crate::rendering::raster;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Why a supplied image could not be used as is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasIssue {
    /// No usable image; a placeholder gradient was generated
    Placeholder,
    /// The image was rescaled from the given size to the atlas size
    Resized { from: (u32, u32) },
}

/// Base atlas ready for display: exactly atlas-sized and opaque
#[derive(Debug, Clone)]
pub struct PreparedAtlas {
    pub image: RgbaImage,
    pub issue: Option<AtlasIssue>,
}

/// Turns an optional decoded image into the base atlas.
///
/// Missing or empty images become a grey gradient, mis-sized ones are
/// stretched to the atlas size. Transparent pixels are composited over black.
pub fn prepare_atlas(image: Option<RgbaImage>, grid: &TileGrid) -> PreparedAtlas {
    let (width, height) = (grid.image_width(), grid.image_height());

    let Some(image) = image.filter(|img| img.width() > 0 && img.height() > 0) else {
        log::warn!("no usable atlas image, using placeholder gradient");
        return PreparedAtlas {
            image: placeholder_gradient(width, height),
            issue: Some(AtlasIssue::Placeholder),
        };
    };

    let (image, issue) = if image.dimensions() != (width, height) {
        let from = image.dimensions();
        log::warn!("atlas image {}x{} resized to {}x{}", from.0, from.1, width, height);
        (
            imageops::resize(&image, width, height, FilterType::Nearest),
            Some(AtlasIssue::Resized { from }),
        )
    } else {
        (image, None)
    };

    PreparedAtlas {
        image: flatten_onto_black(image),
        issue,
    }
}

/// Light grey vertical gradient, `200 + 55 * y / height` per row
pub fn placeholder_gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let value = (200.0 + 55.0 * y as f64 / height.max(1) as f64) as u8;
        Rgba([value, value, value, 255])
    })
}

fn flatten_onto_black(image: RgbaImage) -> RgbaImage {
    if image.pixels().all(|p| p[3] == 255) {
        return image;
    }
    let mut flat = RgbaImage::from_pixel(image.width(), image.height(), Rgba([0, 0, 0, 255]));
    raster::blit(&mut flat, &image, 0, 0);
    flat
}
