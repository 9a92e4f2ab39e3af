//! Small set of clipped pixel operations on RGBA buffers.
//!
//! Blending is straight-alpha "source over". Coordinates are signed so callers
//! can pass positions that fall partly or wholly off the buffer.

use image::{Rgba, RgbaImage};

/// Blends `src` over `dst` in place
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }

    let da = dst[3] as u32;
    let inv = 255 - sa;
    // alpha of the result, scaled by 255
    let den = sa * 255 + da * inv;
    if den == 0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * inv;
        dst[c] = ((num + den / 2) / den) as u8;
    }
    dst[3] = ((den + 127) / 255) as u8;
}

/// Blends a solid rectangle, clipped to the buffer
pub fn fill_rect(image: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = clip(image, x, y, width as i64, height as i64) else {
        return;
    };
    for py in y0..y1 {
        for px in x0..x1 {
            blend_pixel(image.get_pixel_mut(px, py), color);
        }
    }
}

/// Blends `src` onto `dst` with its top-left corner at `(x, y)`
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let Some((x0, y0, x1, y1)) = clip(dst, x, y, src.width() as i64, src.height() as i64) else {
        return;
    };
    for py in y0..y1 {
        for px in x0..x1 {
            let sx = (px as i64 - x) as u32;
            let sy = (py as i64 - y) as u32;
            blend_pixel(dst.get_pixel_mut(px, py), *src.get_pixel(sx, sy));
        }
    }
}

/// Horizontal one-pixel line from `x0` to `x1` inclusive
pub fn hline(image: &mut RgbaImage, x0: i64, x1: i64, y: i64, color: Rgba<u8>) {
    let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    fill_rect(image, lo, y, (hi - lo + 1) as u32, 1, color);
}

/// Vertical one-pixel line from `y0` to `y1` inclusive
pub fn vline(image: &mut RgbaImage, x: i64, y0: i64, y1: i64, color: Rgba<u8>) {
    let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    fill_rect(image, x, lo, 1, (hi - lo + 1) as u32, color);
}

/// Intersects a rectangle with the buffer, returning `[x0, x1) x [y0, y1)`
fn clip(image: &RgbaImage, x: i64, y: i64, width: i64, height: i64) -> Option<(u32, u32, u32, u32)> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(image.width() as i64);
    let y1 = (y + height).min(image.height() as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_over_opaque() {
        let mut dst = Rgba([200, 200, 200, 255]);
        blend_pixel(&mut dst, Rgba([0, 0, 0, 70]));

        // 200 * (185 / 255) = 145.1
        assert_eq!(dst, Rgba([145, 145, 145, 255]));
    }

    #[test]
    fn test_blend_extremes() {
        let mut dst = Rgba([10, 20, 30, 255]);
        blend_pixel(&mut dst, Rgba([255, 0, 0, 0]));
        assert_eq!(dst, Rgba([10, 20, 30, 255]));

        blend_pixel(&mut dst, Rgba([1, 2, 3, 255]));
        assert_eq!(dst, Rgba([1, 2, 3, 255]));

        let mut empty = Rgba([0, 0, 0, 0]);
        blend_pixel(&mut empty, Rgba([50, 200, 50, 128]));
        assert_eq!(empty, Rgba([50, 200, 50, 128]));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        fill_rect(&mut image, -2, 3, 4, 10, Rgba([9, 9, 9, 255]));

        assert_eq!(*image.get_pixel(0, 3), Rgba([9, 9, 9, 255]));
        assert_eq!(*image.get_pixel(1, 3), Rgba([9, 9, 9, 255]));
        assert_eq!(*image.get_pixel(2, 3), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(0, 2), Rgba([0, 0, 0, 255]));

        // entirely outside
        fill_rect(&mut image, 10, 10, 2, 2, Rgba([1, 1, 1, 255]));
    }

    #[test]
    fn test_lines_are_inclusive() {
        let mut image = RgbaImage::from_pixel(5, 5, Rgba([0, 0, 0, 255]));
        let white = Rgba([255, 255, 255, 255]);
        hline(&mut image, 3, 1, 0, white);
        vline(&mut image, 4, 0, 9, white);

        let lit = image.pixels().filter(|p| **p == white).count();
        assert_eq!(lit, 3 + 5);
    }

    #[test]
    fn test_blit_offset() {
        let mut dst = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(2, 2, Rgba([7, 7, 7, 255]));
        blit(&mut dst, &src, 2, -1);

        assert_eq!(*dst.get_pixel(2, 0), Rgba([7, 7, 7, 255]));
        assert_eq!(*dst.get_pixel(2, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*dst.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
    }
}
