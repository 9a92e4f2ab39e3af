use crate::core::config::ColorConfig;
use crate::rendering::cache::RenderCache;
use crate::rendering::frame::FramePlan;
use crate::rendering::{glyphs, raster};
use image::RgbaImage;

/// Rasterises a frame plan into a screen-sized buffer.
///
/// Layers go background, scaled atlas, dimming overlay, grid, labels,
/// selection, hover. Anything the cache has not built yet is skipped.
pub fn compose_frame(
    plan: &FramePlan,
    cache: &RenderCache,
    colors: &ColorConfig,
    screen_size: (u32, u32),
) -> RgbaImage {
    let (width, height) = (screen_size.0.max(1), screen_size.1.max(1));
    let mut frame = RgbaImage::from_pixel(width, height, colors.background.to_rgba());
    let (origin_x, origin_y) = plan.image_origin;

    if let Some(scaled) = cache.scaled_image() {
        raster::blit(&mut frame, scaled, origin_x, origin_y);
    }
    if plan.show_overlay {
        if let Some(overlay) = cache.dim_overlay() {
            raster::blit(&mut frame, overlay, origin_x, origin_y);
        }
    }

    let grid_color = colors.grid.to_rgba();
    for line in &plan.grid_lines {
        if line.is_vertical() {
            raster::vline(&mut frame, line.x0, line.y0, line.y1, grid_color);
        } else {
            raster::hline(&mut frame, line.x0, line.x1, line.y0, grid_color);
        }
    }

    if !plan.labels.is_empty() {
        let scale = glyphs::scale_for_size(plan.label_size);
        let color = colors.tile_number_text.to_rgba();
        for label in &plan.labels {
            glyphs::draw_text_centered(&mut frame, &label.text, label.center_x, label.center_y, scale, color);
        }
    }

    if let Some(surfaces) = cache.overlay_surfaces() {
        for &(x, y) in &plan.selected {
            raster::blit(&mut frame, surfaces.select, x, y);
        }
        if let Some((x, y)) = plan.hover {
            raster::blit(&mut frame, surfaces.hover, x, y);
        }
    }

    frame
}
