//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::{GenerationConfig, PolicyKind};
use clap::{Args, ValueEnum};

/// Suit processing policies accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PolicyArg {
    Recolor,
    Contour,
}

impl From<PolicyArg> for PolicyKind {
    fn from(value: PolicyArg) -> PolicyKind {
        match value {
            PolicyArg::Recolor => PolicyKind::Recolor,
            PolicyArg::Contour => PolicyKind::Contour,
        }
    }
}

/// Settings shared by every command. Flags override the config file.
#[derive(Args, Debug)]
pub struct DeckArgs {
    /// JSON settings file (`input_folder`, `output_folder`, `prefix_string`,
    /// `app_params.Design`).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Folder holding im-back, im-front, suit-* and the font.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
    /// Prefix of generated file names.
    #[arg(short = 'p', long)]
    pub prefix: Option<String>,
    /// Suit processing policy.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
    /// Contour simplification and smoothing strength.
    #[arg(long)]
    pub smoothness: Option<f64>,
    /// Points sampled along each smoothed suit outline.
    #[arg(long = "curve-resolution")]
    pub curve_resolution: Option<usize>,
    /// Scale applied to the extracted suit glyphs.
    #[arg(long = "suit-scale")]
    pub suit_scale: Option<f32>,
    /// Keep the suit artwork's own colors.
    #[arg(long = "no-recolor")]
    pub no_recolor: bool,
}

impl DeckArgs {
    /// Merge the config file (or defaults) with command-line overrides.
    pub fn resolve(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_json_file(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => GenerationConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input_folder = input.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(policy) = self.policy {
            config.policy = policy.into();
        }
        if let Some(smoothness) = self.smoothness {
            config.smoothness = smoothness;
        }
        if let Some(resolution) = self.curve_resolution {
            config.curve_resolution = resolution;
        }
        if let Some(scale) = self.suit_scale {
            config.main_suit_scale = scale;
        }
        if self.no_recolor {
            config.recolor_enabled = false;
        }
        Ok(config)
    }
}
