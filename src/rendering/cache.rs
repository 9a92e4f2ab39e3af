use crate::core::config::{Color, ColorConfig};
use crate::core::constants::ZOOM_EPSILON;
use crate::core::viewport::Viewport;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Scaled highlight tiles borrowed from the cache
#[derive(Debug, Clone, Copy)]
pub struct OverlaySurfaces<'a> {
    pub hover: &'a RgbaImage,
    pub select: &'a RgbaImage,
}

/// Render artifacts derived from the base atlas at the effective zoom.
///
/// The cache either fully matches the zoom it was last built for or is
/// dirty. Rebuilds are skipped when the effective zoom is within
/// [`ZOOM_EPSILON`] of the cached one, so floating-point noise does not
/// thrash it.
#[derive(Debug, Clone)]
pub struct RenderCache {
    tile_size: u32,
    overlay_color: Color,
    base_hover: RgbaImage,
    base_select: RgbaImage,
    scaled_image: Option<RgbaImage>,
    dim_overlay: Option<RgbaImage>,
    hover_tile: Option<RgbaImage>,
    select_tile: Option<RgbaImage>,
    cached_zoom: Option<f64>,
    dirty: bool,
    rebuilds: u64,
}

impl RenderCache {
    pub fn new(tile_size: u32, colors: &ColorConfig) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            tile_size,
            overlay_color: colors.overlay,
            base_hover: RgbaImage::from_pixel(tile_size, tile_size, colors.tile_hover.to_rgba()),
            base_select: RgbaImage::from_pixel(tile_size, tile_size, colors.tile_select.to_rgba()),
            scaled_image: None,
            dim_overlay: None,
            hover_tile: None,
            select_tile: None,
            cached_zoom: None,
            dirty: true,
            rebuilds: 0,
        }
    }

    /// Replaces the highlight and overlay colors; the next refresh rebuilds
    pub fn set_colors(&mut self, colors: &ColorConfig) {
        self.overlay_color = colors.overlay;
        self.base_hover = RgbaImage::from_pixel(self.tile_size, self.tile_size, colors.tile_hover.to_rgba());
        self.base_select = RgbaImage::from_pixel(self.tile_size, self.tile_size, colors.tile_select.to_rgba());
        self.invalidate();
    }

    /// Marks the cache stale, e.g. after the base image is replaced
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the cached artifacts match `effective_zoom`
    pub fn is_valid_for(&self, effective_zoom: f64) -> bool {
        !self.dirty
            && self
                .cached_zoom
                .map_or(false, |cached| (cached - effective_zoom).abs() <= ZOOM_EPSILON)
    }

    /// Rebuilds every artifact if the viewport's effective zoom moved or the
    /// cache was invalidated. Returns whether a rebuild happened.
    pub fn refresh(&mut self, base: &RgbaImage, viewport: &Viewport) -> bool {
        let zoom = viewport.effective_zoom();
        if self.is_valid_for(zoom) {
            return false;
        }

        let (width, height) = viewport.surface_size();
        self.scaled_image = Some(if base.width() == 0 || base.height() == 0 {
            RgbaImage::from_pixel(width, height, Color::TRANSPARENT.to_rgba())
        } else {
            imageops::resize(base, width, height, FilterType::Nearest)
        });
        self.dim_overlay = Some(RgbaImage::from_pixel(width, height, self.overlay_color.to_rgba()));

        let tile_px = (self.tile_size as f64 * zoom).round();
        if tile_px < 1.0 {
            // never scale to zero
            let placeholder = RgbaImage::from_pixel(1, 1, Color::TRANSPARENT.to_rgba());
            self.hover_tile = Some(placeholder.clone());
            self.select_tile = Some(placeholder);
        } else {
            let tile_px = tile_px as u32;
            self.hover_tile = Some(imageops::resize(&self.base_hover, tile_px, tile_px, FilterType::Nearest));
            self.select_tile = Some(imageops::resize(&self.base_select, tile_px, tile_px, FilterType::Nearest));
        }

        self.cached_zoom = Some(zoom);
        self.dirty = false;
        self.rebuilds += 1;
        log::debug!(
            "render cache rebuilt at effective zoom {:.4} ({}x{})",
            zoom,
            width,
            height
        );
        true
    }

    pub fn scaled_image(&self) -> Option<&RgbaImage> {
        self.scaled_image.as_ref()
    }

    pub fn dim_overlay(&self) -> Option<&RgbaImage> {
        self.dim_overlay.as_ref()
    }

    pub fn overlay_surfaces(&self) -> Option<OverlaySurfaces<'_>> {
        Some(OverlaySurfaces {
            hover: self.hover_tile.as_ref()?,
            select: self.select_tile.as_ref()?,
        })
    }

    pub fn cached_zoom(&self) -> Option<f64> {
        self.cached_zoom
    }

    /// Number of rebuilds since creation
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}
