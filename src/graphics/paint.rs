use image::imageops::{self, FilterType, overlay, replace, rotate180};
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use crate::assets::AssetSet;
use crate::geometry::{CardSpec, DeckGeometry, Rank};
use crate::graphics::font::RankFont;

const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Compose one full card: decorated front half on the left, back on the right.
///
/// Every overlay is alpha-composited, so transparent parts of a glyph never
/// hide the artwork underneath.
pub fn compose_card(assets: &AssetSet, geometry: &DeckGeometry, card: &CardSpec) -> RgbImage {
    let (half_width, half_height) = geometry.half_card_size();
    let color = geometry.suit_color(card.suit);
    let glyph = assets.suit_glyph(card.suit);
    let inset = geometry.corner_inset as i64;

    let mut front = assets.front().clone();

    let top = stacked_value_suit(assets.font(), glyph, geometry, card.rank, color);
    overlay(&mut front, &top, inset, inset);

    let bottom = rotate180(&top);
    overlay(
        &mut front,
        &bottom,
        half_width as i64 - inset - bottom.width() as i64,
        half_height as i64 - inset - bottom.height() as i64,
    );

    let (emblem_x, emblem_y) = centered(glyph.dimensions(), (half_width, half_height));
    overlay(&mut front, glyph, emblem_x, emblem_y);

    let (card_width, card_height) = geometry.card_size;
    let mut canvas = RgbaImage::from_pixel(card_width, card_height, Rgba([0, 0, 0, 255]));
    replace(&mut canvas, &front, 0, 0);
    replace(&mut canvas, assets.back(), half_width as i64, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// Rank label with a text-wide copy of the suit glyph underneath, on a
/// transparent buffer two font sizes wide and three tall.
///
/// Labels wider than the buffer are drawn anyway and clipped.
pub fn stacked_value_suit(
    font: &dyn RankFont,
    glyph: &RgbaImage,
    geometry: &DeckGeometry,
    rank: Rank,
    color: Rgba<u8>,
) -> RgbaImage {
    let size = font.pixel_size();
    let (width, height) = (size * 2, size * 3);
    let gap = geometry.stack_gap.unwrap_or(size / 2);
    let label = rank.symbol();

    let mut stack = RgbaImage::from_pixel(width, height, TRANSPARENT);
    let (text_width, text_height) = font.measure(label);
    let x = (width as i64 - text_width as i64).div_euclid(2);
    font.draw(&mut stack, x as i32, 0, color, label);

    if text_width > 0 {
        let suit = imageops::resize(glyph, text_width, text_width, FilterType::Lanczos3);
        overlay(&mut stack, &suit, x, text_height as i64 + gap as i64);
    }
    stack
}

fn centered(inner: (u32, u32), outer: (u32, u32)) -> (i64, i64) {
    (
        (outer.0 as i64 - inner.0 as i64).div_euclid(2),
        (outer.1 as i64 - inner.1 as i64).div_euclid(2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Suit;
    use crate::graphics::font::BlockFont;
    use image::Rgb;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    const FRONT: Rgba<u8> = Rgba([240, 235, 220, 255]);
    const BACK: Rgba<u8> = Rgba([20, 40, 160, 255]);

    fn geometry() -> DeckGeometry {
        DeckGeometry {
            card_size: (160, 120),
            suit_size: (24, 24),
            font_size: 14,
            corner_inset: 4,
            ..DeckGeometry::default()
        }
    }

    fn assets(geometry: &DeckGeometry) -> AssetSet {
        let (w, h) = geometry.half_card_size();
        let suits: BTreeMap<Suit, RgbaImage> = Suit::ALL
            .into_iter()
            .map(|suit| (suit, RgbaImage::from_pixel(24, 24, geometry.suit_color(suit))))
            .collect();
        AssetSet::new(
            geometry,
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, BACK)),
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, FRONT)),
            suits,
            Box::new(BlockFont::new(geometry.font_size)),
        )
        .unwrap()
    }

    fn rgb(px: Rgba<u8>) -> Rgb<u8> {
        Rgb([px[0], px[1], px[2]])
    }

    fn card(rank: Rank, suit: Suit) -> CardSpec {
        CardSpec {
            rank,
            suit,
            sequence_index: 0,
        }
    }

    #[test]
    fn card_has_front_and_back_halves() {
        let geometry = geometry();
        let assets = assets(&geometry);
        let image = compose_card(&assets, &geometry, &card(Rank::Two, Suit::Heart));
        assert_eq!(image.dimensions(), (160, 120));
        assert_eq!(*image.get_pixel(1, 1), rgb(FRONT));
        assert_eq!(*image.get_pixel(80, 0), rgb(BACK));
        assert_eq!(*image.get_pixel(159, 119), rgb(BACK));
    }

    #[test]
    fn corners_and_emblem_use_suit_color() {
        let geometry = geometry();
        let assets = assets(&geometry);
        for (suit, expected) in [(Suit::Heart, geometry.red), (Suit::Spade, geometry.black)] {
            let image = compose_card(&assets, &geometry, &card(Rank::Two, suit));
            // Emblem centered on the 80x120 front half.
            assert_eq!(*image.get_pixel(40, 60), rgb(expected));
            // First row of '2' (0b01110) in the top-left stack: stack x 9 + 2,
            // shifted by the inset.
            assert_eq!(*image.get_pixel(15, 4), rgb(expected));
            // The same pixel after the 180 degree turn, placed at (48, 74).
            assert_eq!(*image.get_pixel(64, 115), rgb(expected));
        }
    }

    #[test]
    fn wide_labels_overflow_without_failing() {
        let geometry = geometry();
        let assets = assets(&geometry);
        let font = BlockFont::new(geometry.font_size);
        let (text_width, _) = font.measure("10");
        assert!(text_width > geometry.font_size * 2);
        let image = compose_card(&assets, &geometry, &card(Rank::Ten, Suit::Club));
        assert_eq!(image.dimensions(), geometry.card_size);
    }

    #[test]
    fn stack_is_transparent_outside_ink() {
        let geometry = geometry();
        let assets = assets(&geometry);
        let stack = stacked_value_suit(
            assets.font(),
            assets.suit_glyph(Suit::Diamond),
            &geometry,
            Rank::Ace,
            geometry.red,
        );
        assert_eq!(stack.dimensions(), (28, 42));
        assert_eq!(stack.get_pixel(0, 41)[3], 0);
        // Suit copy sits below the label, half a font size down.
        let suit_top = 14 + 7;
        assert_eq!(*stack.get_pixel(14, suit_top + 2), geometry.red);
    }

    #[test]
    fn composition_is_deterministic() {
        let geometry = geometry();
        let assets = assets(&geometry);
        let spec = card(Rank::Queen, Suit::Diamond);
        let a = compose_card(&assets, &geometry, &spec);
        let b = compose_card(&assets, &geometry, &spec);
        assert!(a == b);
    }
}
