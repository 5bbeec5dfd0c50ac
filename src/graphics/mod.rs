//! Raster stages of the pipeline: suit glyph extraction, rank fonts, and
//! card composition.

mod font;
pub mod outline;
mod paint;
mod suit;

pub use font::{BlockFont, GLYPH_HEIGHT, GLYPH_WIDTH, RankFont, TrueTypeFont};
pub use outline::{Outline, OutlineError, fit_to_canvas, outline_from_mask};
pub use paint::{compose_card, stacked_value_suit};
pub use suit::{SuitExtractor, ink_mask};
