use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Suit;

/// Every way deck generation can fail. All variants are fatal for the run.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    #[error("missing input files: {} in folder {}", patterns.join(", "), folder.display())]
    MissingAssets {
        patterns: Vec<String>,
        folder: PathBuf,
    },

    #[error("failed to create output folder {}", path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load asset {}: {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },

    #[error("could not extract an outline for suit '{suit}': {reason}")]
    SuitExtraction { suit: Suit, reason: String },

    #[error("failed to write {} after {completed} card(s)", path.display())]
    RenderIo {
        path: PathBuf,
        completed: usize,
        #[source]
        source: image::ImageError,
    },
}

impl DeckError {
    /// Cards fully written before the failure. Only a write failure can
    /// happen mid-deck; every other variant aborts before the first card.
    pub fn cards_completed(&self) -> usize {
        match self {
            DeckError::RenderIo { completed, .. } => *completed,
            _ => 0,
        }
    }
}

pub type DeckResult<T> = Result<T, DeckError>;
