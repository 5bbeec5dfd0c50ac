//! `cardforge generate`: write the deck to disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::DeckGenerator;
use clap::Args;

use crate::cli::common::DeckArgs;

/// Args for `cardforge generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub deck: DeckArgs,
    /// Folder receiving the card PNGs (created if missing).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Number of cards to render, in canonical order (1-52).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
}

pub fn handle(args: GenerateArgs) -> Result<()> {
    let mut config = args.deck.resolve()?;
    if let Some(output) = args.output {
        config.output_folder = output;
    }
    if let Some(count) = args.count {
        config.card_count = count;
    }

    let generator = DeckGenerator::load(config).context("failed to prepare deck assets")?;
    let output = generator.config().output_folder.clone();
    let written = generator
        .generate_deck(|| false, |event| println!("Generated: {}", event.file_name))
        .map_err(|err| {
            let completed = err.cards_completed();
            anyhow::Error::new(err)
                .context(format!("deck generation stopped after {} card(s)", completed))
        })?;

    println!("Generated {} cards into {}", written, output.display());
    Ok(())
}
