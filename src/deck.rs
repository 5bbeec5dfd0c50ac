//! Deck iteration: renders cards in canonical order and writes them out.

use std::path::PathBuf;

use image::RgbImage;
use tracing::info;

use crate::assets::{AssetResolver, AssetSet, ensure_output_folder};
use crate::config::GenerationConfig;
use crate::error::{DeckError, DeckResult};
use crate::geometry::{CardSpec, DECK_SIZE};
use crate::graphics::compose_card;

/// Report emitted after each card lands on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardWritten {
    /// Cards written so far, including this one.
    pub count: usize,
    pub file_name: String,
    pub path: PathBuf,
}

/// Walks the canonical deck over a prepared asset set.
pub struct DeckDriver<'a> {
    assets: &'a AssetSet,
    config: &'a GenerationConfig,
}

impl<'a> DeckDriver<'a> {
    pub fn new(assets: &'a AssetSet, config: &'a GenerationConfig) -> Self {
        Self { assets, config }
    }

    pub fn render(&self, card: &CardSpec) -> RgbImage {
        compose_card(self.assets, &self.config.geometry, card)
    }

    /// Render the card at a 0-based sequence index without touching disk.
    /// `None` falls back to the configured preview index.
    pub fn preview(&self, index: Option<usize>) -> DeckResult<RgbImage> {
        let index = index.unwrap_or(self.config.preview_index);
        let card = CardSpec::at(index).ok_or_else(|| {
            DeckError::ConfigValidation(format!(
                "preview index {} is outside 0..{}",
                index, DECK_SIZE
            ))
        })?;
        Ok(self.render(&card))
    }

    /// Write the first `card_count` cards of the deck.
    ///
    /// `stop` is polled before each card; once it returns true the run ends
    /// and reports how many cards were written. A failed write aborts the
    /// run, and cards already written stay on disk.
    pub fn run<S, R>(&self, mut stop: S, mut on_card: R) -> DeckResult<usize>
    where
        S: FnMut() -> bool,
        R: FnMut(&CardWritten),
    {
        let mut count = 0;
        for card in CardSpec::canonical().take(self.config.card_count) {
            if stop() {
                info!(count, "card generation stopped by caller");
                return Ok(count);
            }

            let image = self.render(&card);
            let file_name = card.file_name(&self.config.prefix);
            let path = self.config.output_folder.join(&file_name);
            image.save(&path).map_err(|source| DeckError::RenderIo {
                path: path.clone(),
                completed: count,
                source,
            })?;

            count += 1;
            info!(count, file = %file_name, "generated card");
            on_card(&CardWritten {
                count,
                file_name,
                path,
            });
        }
        info!(count, "generated cards");
        Ok(count)
    }
}

/// A validated configuration bound to its loaded assets.
///
/// Build a new one whenever the input folder or design parameters change.
pub struct DeckGenerator {
    config: GenerationConfig,
    assets: AssetSet,
}

impl DeckGenerator {
    /// Validate, resolve the inputs, prepare the output folder, then decode
    /// and process every asset. Fails before any file I/O on a bad config.
    pub fn load(config: GenerationConfig) -> DeckResult<Self> {
        Self::prepare(config, true)
    }

    /// Same as [`DeckGenerator::load`] but leaves the output folder alone,
    /// for callers that only render previews.
    pub fn load_for_preview(config: GenerationConfig) -> DeckResult<Self> {
        Self::prepare(config, false)
    }

    fn prepare(config: GenerationConfig, create_output: bool) -> DeckResult<Self> {
        config.validate()?;
        let resolved = AssetResolver::new(&config.input_folder).resolve()?;
        if create_output {
            ensure_output_folder(&config.output_folder)?;
        }
        let assets = resolved.load(&config.geometry, config.suit_policy())?;
        info!(
            input = %config.input_folder.display(),
            font = %resolved.font.display(),
            policy = ?config.suit_policy(),
            "loaded deck assets"
        );
        Ok(Self { config, assets })
    }

    /// Pair a config with assets built elsewhere, e.g. in memory.
    pub fn from_parts(config: GenerationConfig, assets: AssetSet) -> DeckResult<Self> {
        config.validate()?;
        Ok(Self { config, assets })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetSet {
        &self.assets
    }

    pub fn driver(&self) -> DeckDriver<'_> {
        DeckDriver::new(&self.assets, &self.config)
    }

    pub fn generate_deck<S, R>(&self, stop: S, on_card: R) -> DeckResult<usize>
    where
        S: FnMut() -> bool,
        R: FnMut(&CardWritten),
    {
        ensure_output_folder(&self.config.output_folder)?;
        self.driver().run(stop, on_card)
    }

    pub fn preview_card(&self, index: Option<usize>) -> DeckResult<RgbImage> {
        self.driver().preview(index)
    }
}

/// One-shot generation: load everything for `config` and write the deck.
pub fn generate<S>(config: &GenerationConfig, stop: S) -> DeckResult<usize>
where
    S: FnMut() -> bool,
{
    DeckGenerator::load(config.clone())?.generate_deck(stop, |_| {})
}
