//! Core library for compositing a playing-card deck from source artwork.
//!
//! The pipeline runs leaves first: [`AssetResolver`] finds the inputs,
//! [`SuitExtractor`] turns raw suit artwork into clean glyphs,
//! [`compose_card`] lays out one card, and [`DeckDriver`] walks the deck.

mod assets;
mod config;
mod deck;
mod error;
mod geometry;
pub mod graphics;

pub use assets::{AssetKind, AssetResolver, AssetSet, ResolvedAssets, ensure_output_folder};
pub use config::{
    AppParams, ConfigFile, ContourParams, DesignParams, GenerationConfig, PolicyKind, SuitPolicy,
};
pub use deck::{CardWritten, DeckDriver, DeckGenerator, generate};
pub use error::{DeckError, DeckResult};
pub use geometry::{CardSpec, DECK_SIZE, DeckGeometry, Rank, Suit};
pub use graphics::{
    BlockFont, RankFont, SuitExtractor, TrueTypeFont, compose_card, outline_from_mask,
};
