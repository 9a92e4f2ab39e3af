use crate::core::bounds::Bounds;
use crate::core::config::ViewConfig;
use crate::core::constants::{MIN_SAFE_ZOOM, ZOOM_EPSILON};
use crate::core::geo::{Point, TileCoord};
use crate::core::grid::TileGrid;
use serde::{Deserialize, Serialize};

/// Manages the current view of the atlas: zoom, pan offset and screen dimensions.
///
/// Two zoom values are tracked. `zoom` is what the user asked for and is the
/// value that zoom steps multiply. `effective_zoom` is what the scaled atlas
/// actually uses once the surface-size ceiling is applied, and every
/// screen/image conversion goes through it. Keeping both lets the requested
/// magnification come back once the ceiling no longer binds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The requested zoom, always within `[min_zoom, max_zoom]`
    zoom: f64,
    /// The zoom after the surface-size ceiling
    effective_zoom: f64,
    /// Screen position of the atlas' top-left corner
    offset: Point,
    screen_width: f64,
    screen_height: f64,
    /// Height at the bottom of the window covered by non-tile UI
    reserved_bottom: f64,
    min_zoom: f64,
    max_zoom: f64,
    max_surface_dim: u32,
    min_screen_width: f64,
    min_screen_height: f64,
    image_width: u32,
    image_height: u32,
    tile_size: u32,
    /// Set when derived surfaces must be rebuilt regardless of zoom
    surfaces_dirty: bool,
}

impl Viewport {
    /// Creates a viewport at zoom 1.0 for the given grid
    pub fn new(grid: &TileGrid, config: &ViewConfig) -> Self {
        let (min_zoom, max_zoom) = config.zoom_bounds();
        let min_zoom = min_zoom.max(MIN_SAFE_ZOOM);
        let max_zoom = max_zoom.max(min_zoom);

        let mut viewport = Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            effective_zoom: 1.0,
            offset: Point::default(),
            screen_width: config.initial_screen_width.max(config.min_screen_width),
            screen_height: config.initial_screen_height.max(config.min_screen_height),
            reserved_bottom: config.panel_height.max(0.0),
            min_zoom,
            max_zoom,
            max_surface_dim: config.max_surface_dim.max(1),
            min_screen_width: config.min_screen_width,
            min_screen_height: config.min_screen_height,
            image_width: grid.image_width(),
            image_height: grid.image_height(),
            tile_size: grid.tile_size(),
            surfaces_dirty: true,
        };
        viewport.update_effective_zoom();
        viewport.clamp();
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn effective_zoom(&self) -> f64 {
        self.effective_zoom
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn screen_width(&self) -> f64 {
        self.screen_width
    }

    pub fn screen_height(&self) -> f64 {
        self.screen_height
    }

    pub fn reserved_bottom(&self) -> f64 {
        self.reserved_bottom
    }

    /// Height of the tile viewing area above the reserved region
    pub fn view_height(&self) -> f64 {
        (self.screen_height - self.reserved_bottom).max(0.0)
    }

    /// Center of the tile viewing area in screen pixels
    pub fn view_center(&self) -> Point {
        Point::new(self.screen_width / 2.0, self.view_height() / 2.0)
    }

    /// Conceptual size of the atlas on screen at the effective zoom
    pub fn scaled_size(&self) -> (f64, f64) {
        (
            self.image_width as f64 * self.effective_zoom,
            self.image_height as f64 * self.effective_zoom,
        )
    }

    /// Pixel size of the rescaled atlas surface, at least 1x1
    pub fn surface_size(&self) -> (u32, u32) {
        let (w, h) = self.scaled_size();
        ((w.round() as u32).max(1), (h.round() as u32).max(1))
    }

    /// On-screen edge length of one tile
    pub fn screen_tile_size(&self) -> f64 {
        self.tile_size as f64 * self.effective_zoom
    }

    /// Sets the requested zoom without moving the anchor. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (zoom - self.zoom).abs() < ZOOM_EPSILON {
            return false;
        }

        log::debug!("zoom {:.4} -> {:.4}", self.zoom, zoom);
        self.zoom = zoom;
        self.update_effective_zoom();
        self.clamp();
        true
    }

    /// Multiplies the zoom by `factor`, keeping the image point under
    /// `anchor` fixed on screen. Returns whether the zoom changed.
    pub fn zoom_at_point(&mut self, factor: f64, anchor: Point) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = old_zoom * factor;
        if !new_zoom.is_finite() {
            return false;
        }
        let new_zoom = new_zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - old_zoom).abs() < ZOOM_EPSILON {
            return false;
        }

        let old_effective = self.effective_zoom;
        self.zoom = new_zoom;
        self.update_effective_zoom();

        // the on-screen scale ratio, so anchoring stays exact under the ceiling
        let ratio = self.effective_zoom / old_effective;
        self.offset = Point::new(
            anchor.x - (anchor.x - self.offset.x) * ratio,
            anchor.y - (anchor.y - self.offset.y) * ratio,
        );
        log::debug!(
            "zoom {:.4} -> {:.4} at ({:.1}, {:.1})",
            old_zoom,
            new_zoom,
            anchor.x,
            anchor.y
        );
        self.clamp();
        true
    }

    /// Zooms around the center of the tile viewing area
    pub fn zoom_at_view_center(&mut self, factor: f64) -> bool {
        self.zoom_at_point(factor, self.view_center())
    }

    /// Moves the atlas by a screen-pixel delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.offset = self.offset.add(&Point::new(dx, dy));
        self.clamp();
    }

    /// Back to zoom 1.0 with the atlas centered
    pub fn reset(&mut self) {
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.update_effective_zoom();

        let (scaled_w, scaled_h) = self.scaled_size();
        self.offset = Point::new(
            (self.screen_width - scaled_w) / 2.0,
            (self.view_height() - scaled_h) / 2.0,
        );
        self.clamp();
    }

    /// Updates the window size, floored at the minimum usable size
    pub fn resize(&mut self, width: f64, height: f64) {
        let width = if width.is_finite() { width } else { self.screen_width };
        let height = if height.is_finite() { height } else { self.screen_height };
        self.screen_width = width.max(self.min_screen_width);
        self.screen_height = height.max(self.min_screen_height);
        self.update_effective_zoom();
        self.clamp();
        self.surfaces_dirty = true;
    }

    /// Changes the height reserved for non-tile UI at the bottom
    pub fn set_reserved_bottom(&mut self, height: f64) {
        self.reserved_bottom = if height.is_finite() { height.max(0.0) } else { 0.0 };
        self.clamp();
    }

    /// Centers the atlas on an axis where it is smaller than the view and
    /// otherwise keeps its edges from moving inside the view.
    pub fn clamp(&mut self) {
        let (scaled_w, scaled_h) = self.scaled_size();
        self.offset = Point::new(
            clamp_axis(self.offset.x, scaled_w, self.screen_width),
            clamp_axis(self.offset.y, scaled_h, self.view_height()),
        );
    }

    /// Puts an image-space point at the center of the viewing area
    pub fn center_on_image_point(&mut self, point: Point) {
        let center = self.view_center();
        let on_screen = point.multiply(self.effective_zoom);
        self.offset = center.subtract(&on_screen);
        self.clamp();
    }

    pub fn screen_to_image(&self, screen: Point) -> Point {
        let zoom = self.safe_zoom();
        Point::new(
            (screen.x - self.offset.x) / zoom,
            (screen.y - self.offset.y) / zoom,
        )
    }

    pub fn image_to_screen(&self, image: Point) -> Point {
        self.offset.add(&image.multiply(self.effective_zoom))
    }

    /// Tile under an image-space point, `None` outside the atlas
    pub fn image_to_tile(&self, image: Point) -> Option<TileCoord> {
        let atlas = Bounds::from_coords(0.0, 0.0, self.image_width as f64, self.image_height as f64);
        if !atlas.contains(&image) {
            return None;
        }
        let tile = self.tile_size as f64;
        Some(TileCoord::new(
            (image.x / tile).floor() as u32,
            (image.y / tile).floor() as u32,
        ))
    }

    /// Whether a screen point lies above the reserved bottom region
    pub fn in_tile_area(&self, screen: Point) -> bool {
        screen.y < self.view_height()
    }

    /// Tile under a screen point; `None` over the reserved region or off the atlas
    pub fn screen_to_tile(&self, screen: Point) -> Option<TileCoord> {
        if !self.in_tile_area(screen) {
            return None;
        }
        self.image_to_tile(self.screen_to_image(screen))
    }

    /// Screen position of a tile's top-left corner
    pub fn tile_screen_origin(&self, coord: TileCoord) -> Point {
        let tile = self.tile_size as f64;
        self.image_to_screen(Point::new(coord.col as f64 * tile, coord.row as f64 * tile))
    }

    /// Image-space rectangle covered by the tile viewing area
    pub fn visible_image_bounds(&self) -> Bounds {
        let min = self.screen_to_image(Point::new(0.0, 0.0));
        let max = self.screen_to_image(Point::new(self.screen_width, self.view_height()));
        Bounds::new(min, max)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Returns and clears the forced-rebuild flag
    pub fn take_surfaces_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.surfaces_dirty, false)
    }

    fn safe_zoom(&self) -> f64 {
        if self.effective_zoom > MIN_SAFE_ZOOM {
            self.effective_zoom
        } else {
            1.0
        }
    }

    fn update_effective_zoom(&mut self) {
        self.effective_zoom = effective_zoom_for(
            self.image_width,
            self.image_height,
            self.zoom,
            self.max_surface_dim,
        );
    }
}

/// Zoom actually applied once the scaled atlas is capped at `max_dim` pixels
/// on its longest side. Aspect ratio is preserved.
pub fn effective_zoom_for(image_width: u32, image_height: u32, zoom: f64, max_dim: u32) -> f64 {
    let width = image_width.max(1) as f64;
    let height = image_height.max(1) as f64;
    let max_dim = max_dim as f64;

    if width * zoom > max_dim || height * zoom > max_dim {
        (max_dim / width).min(max_dim / height)
    } else {
        zoom
    }
}

fn clamp_axis(offset: f64, scaled: f64, view: f64) -> f64 {
    if scaled < view {
        (view - scaled) / 2.0
    } else {
        offset.clamp(view - scaled, 0.0)
    }
}
