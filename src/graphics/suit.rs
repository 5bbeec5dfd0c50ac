use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use tracing::debug;

use crate::config::{ContourParams, SuitPolicy};
use crate::error::{DeckError, DeckResult};
use crate::geometry::{DeckGeometry, Suit};
use crate::graphics::outline::{fit_to_canvas, outline_from_mask};

/// Pixels at least this opaque can be ink.
const INK_MIN_ALPHA: u8 = 128;
/// Pixels at least this bright count as background.
const BACKGROUND_MIN_LUMA: u8 = 240;

/// Turns raw suit artwork into a transparent glyph in the suit's color.
pub struct SuitExtractor<'a> {
    geometry: &'a DeckGeometry,
    policy: SuitPolicy,
}

impl<'a> SuitExtractor<'a> {
    pub fn new(geometry: &'a DeckGeometry, policy: SuitPolicy) -> Self {
        Self { geometry, policy }
    }

    pub fn extract(&self, suit: Suit, source: &DynamicImage) -> DeckResult<RgbaImage> {
        let source = source.to_rgba8();
        let color = self.geometry.suit_color(suit);
        let glyph = match self.policy {
            SuitPolicy::Recolor { recolor, scale } => {
                let tinted = if recolor {
                    colorize(&source, color)
                } else {
                    source.clone()
                };
                scale_uniform(&tinted, scale)
            }
            SuitPolicy::ContourExtract(params) => self.trace(suit, &source, color, params)?,
        };
        debug!(
            suit = %suit,
            policy = ?self.policy,
            source = ?source.dimensions(),
            glyph = ?glyph.dimensions(),
            "extracted suit glyph"
        );
        Ok(glyph)
    }

    fn trace(
        &self,
        suit: Suit,
        source: &RgbaImage,
        color: Rgba<u8>,
        params: ContourParams,
    ) -> DeckResult<RgbaImage> {
        let mask = ink_mask(source);
        let outline = outline_from_mask(&mask, params.smoothness, params.curve_resolution)
            .map_err(|err| DeckError::SuitExtraction {
                suit,
                reason: err.to_string(),
            })?;

        let (width, height) = self.geometry.suit_size;
        let width = scaled(width, params.scale);
        let height = scaled(height, params.scale);
        let fitted = fit_to_canvas(&outline, width, height);
        rasterize(&fitted, width, height, color).ok_or_else(|| DeckError::SuitExtraction {
            suit,
            reason: "outline collapses at the target size".to_string(),
        })
    }
}

/// Binary mask of the artwork: opaque, non-white pixels become 255.
pub fn ink_mask(source: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(source.width(), source.height(), |x, y| {
        let px = source.get_pixel(x, y);
        let luma = px.to_luma()[0];
        if px[3] >= INK_MIN_ALPHA && luma < BACKGROUND_MIN_LUMA {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Map grayscale intensity onto a black-to-`color` ramp, keeping alpha.
fn colorize(source: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut out = source.clone();
    for px in out.pixels_mut() {
        let luma = px.to_luma()[0] as u32;
        let ramp = |channel: u8| ((channel as u32 * luma + 127) / 255) as u8;
        *px = Rgba([ramp(color[0]), ramp(color[1]), ramp(color[2]), px[3]]);
    }
    out
}

fn scale_uniform(image: &RgbaImage, scale: f32) -> RgbaImage {
    if scale == 1.0 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    imageops::resize(
        image,
        scaled(width, scale),
        scaled(height, scale),
        FilterType::Lanczos3,
    )
}

fn scaled(length: u32, scale: f32) -> u32 {
    ((length as f32 * scale) as u32).max(1)
}

/// Fill a closed outline onto a transparent canvas.
fn rasterize(points: &[Point<f64>], width: u32, height: u32, color: Rgba<u8>) -> Option<RgbaImage> {
    let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for p in points {
        let q = Point::new(p.x.round() as i32, p.y.round() as i32);
        if poly.last() != Some(&q) {
            poly.push(q);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() < 3 {
        return None;
    }

    let mut canvas = RgbaImage::new(width, height);
    draw_polygon_mut(&mut canvas, &poly, color);
    Some(canvas)
}
