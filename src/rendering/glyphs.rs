//! Built-in 3x5 bitmap digits for tile labels.

use crate::rendering::raster;
use image::{Rgba, RgbaImage};

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

/// One row per entry, most significant of the low three bits is the left pixel.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Integer glyph scale for a label size in pixels
pub fn scale_for_size(size: u32) -> u32 {
    (size / 7).max(1)
}

/// Pixel extent of `text` at `scale`; non-digits still take up a cell
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let count = text.chars().count() as u32;
    if count == 0 {
        return (0, 0);
    }
    let width = (count * GLYPH_WIDTH + (count - 1)) * scale;
    (width, GLYPH_HEIGHT * scale)
}

/// Draws `text` centered on `(center_x, center_y)`
pub fn draw_text_centered(
    image: &mut RgbaImage,
    text: &str,
    center_x: i64,
    center_y: i64,
    scale: u32,
    color: Rgba<u8>,
) {
    let (width, height) = text_size(text, scale);
    let left = center_x - (width / 2) as i64;
    let top = center_y - (height / 2) as i64;
    draw_text(image, text, left, top, scale, color);
}

/// Draws `text` with its top-left corner at `(x, y)`
pub fn draw_text(image: &mut RgbaImage, text: &str, x: i64, y: i64, scale: u32, color: Rgba<u8>) {
    let advance = ((GLYPH_WIDTH + 1) * scale) as i64;
    for (index, ch) in text.chars().enumerate() {
        let Some(rows) = ch.to_digit(10).map(|d| &DIGITS[d as usize]) else {
            continue;
        };
        let origin_x = x + index as i64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0b100 >> col) != 0 {
                    raster::fill_rect(
                        image,
                        origin_x + (col * scale) as i64,
                        y + row as i64 * scale as i64,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }
}
