//! `cardforge preview`: render one card without generating the deck.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::DeckGenerator;
use clap::Args;

use crate::cli::common::DeckArgs;

/// Args for `cardforge preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub deck: DeckArgs,
    /// 0-based card index; defaults to the configured preview index.
    #[arg(long)]
    pub index: Option<usize>,
    /// PNG file to write.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

pub fn handle(args: PreviewArgs) -> Result<()> {
    let mut config = args.deck.resolve()?;
    if let Some(index) = args.index {
        config.preview_index = index;
    }

    let generator =
        DeckGenerator::load_for_preview(config).context("failed to prepare deck assets")?;
    let image = generator.preview_card(None)?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "Rendered card {} to {}",
        generator.config().preview_index,
        args.output.display()
    );
    Ok(())
}
