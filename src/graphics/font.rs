use std::fs;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::error::{DeckError, DeckResult};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;

/// Anything that can measure and draw a rank label.
pub trait RankFont {
    /// Nominal size in pixels; the corner stack buffer is derived from it.
    fn pixel_size(&self) -> u32;
    /// Width and height of the rendered text.
    fn measure(&self, text: &str) -> (u32, u32);
    /// Draw `text` with its top-left corner at `(x, y)`. Out-of-bounds pixels
    /// are clipped.
    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str);
}

/// A scalable font file rendered through `ab_glyph`.
pub struct TrueTypeFont {
    font: FontArc,
    size: u32,
}

impl TrueTypeFont {
    pub fn from_file(path: &Path, size: u32) -> DeckResult<Self> {
        let bytes = fs::read(path).map_err(|err| DeckError::AssetLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|err| DeckError::AssetLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(Self { font, size })
    }

    fn scale(&self) -> PxScale {
        PxScale::from(self.size as f32)
    }
}

impl RankFont for TrueTypeFont {
    fn pixel_size(&self) -> u32 {
        self.size
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        text_size(self.scale(), &self.font, text)
    }

    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale(), &self.font, text);
    }
}

/// Built-in 5x7 block font covering the rank labels, scaled to a pixel size.
/// Needs no font file, so it suits headless rendering.
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    size: u32,
}

impl BlockFont {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// Edge length of one block, so that a glyph is about `size` tall.
    fn cell(&self) -> u32 {
        (self.size / GLYPH_HEIGHT).max(1)
    }
}

impl RankFont for BlockFont {
    fn pixel_size(&self) -> u32 {
        self.size
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        let count = text.chars().count() as u32;
        if count == 0 {
            return (0, 0);
        }
        let cell = self.cell();
        let width = (count * (GLYPH_WIDTH + 1) - 1) * cell;
        (width, GLYPH_HEIGHT * cell)
    }

    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        let cell = self.cell();
        let advance = ((GLYPH_WIDTH + 1) * cell) as i32;
        for (idx, ch) in text.chars().enumerate() {
            draw_glyph(canvas, x + idx as i32 * advance, y, ch, color, cell);
        }
    }
}

fn draw_glyph(image: &mut RgbaImage, x: i32, y: i32, ch: char, color: Rgba<u8>, cell: u32) {
    let pattern = glyph_pattern(ch);
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col * cell) as i32;
                let py = y + (row as u32 * cell) as i32;
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(cell, cell), color);
            }
        }
    }
}

#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        _ => [0; GLYPH_HEIGHT as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_font_measures_per_character() {
        let font = BlockFont::new(14);
        assert_eq!(font.measure("7"), (10, 14));
        assert_eq!(font.measure("10"), (22, 14));
        assert_eq!(font.measure(""), (0, 0));
    }

    #[test]
    fn block_font_draws_in_color() {
        let font = BlockFont::new(7);
        let mut canvas = RgbaImage::new(12, 8);
        let color = Rgba([10, 20, 30, 255]);
        font.draw(&mut canvas, 0, 0, color, "A");
        // Top row of 'A' is 0b01110.
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
        assert_eq!(*canvas.get_pixel(1, 0), color);
        assert_eq!(*canvas.get_pixel(0, 3), color);
    }

    #[test]
    fn block_font_clips_out_of_bounds() {
        let font = BlockFont::new(70);
        let mut canvas = RgbaImage::new(4, 4);
        font.draw(&mut canvas, -20, -20, Rgba([1, 2, 3, 255]), "10");
    }

    #[test]
    fn unreadable_font_file_is_an_asset_error() {
        let path = std::env::temp_dir().join("cardforge-missing-font.ttf");
        let err = TrueTypeFont::from_file(&path, 20).err();
        assert!(matches!(err, Some(DeckError::AssetLoad { .. })));
    }
}
