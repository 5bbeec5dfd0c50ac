//! Generation settings: the validated runtime config and the JSON schema it
//! can be loaded from.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DeckError, DeckResult};
use crate::geometry::{DECK_SIZE, DeckGeometry};

pub const DEFAULT_SMOOTHNESS: f64 = 0.0001;
pub const DEFAULT_CURVE_RESOLUTION: usize = 100;
pub const DEFAULT_PREVIEW_INDEX: usize = 42;
/// Largest accepted main suit scale.
pub const MAX_SUIT_SCALE: f32 = 4.0;

/// Which suit processing policy the config selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Recolor,
    Contour,
}

/// Parameters for the contour-extraction policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourParams {
    /// Polygon simplification tolerance as a fraction of the contour
    /// perimeter; also weights the spline smoothing.
    pub smoothness: f64,
    /// Number of points sampled from the smoothed outline.
    pub curve_resolution: usize,
    /// Multiplier applied to the suit target canvas.
    pub scale: f32,
}

/// How raw suit artwork is turned into a composable glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuitPolicy {
    /// Keep the artwork, optionally recolor it, then scale it.
    Recolor { recolor: bool, scale: f32 },
    /// Trace the artwork's largest shape and redraw it as a smooth fill.
    ContourExtract(ContourParams),
}

/// Fully resolved settings for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub prefix: String,
    pub card_count: usize,
    pub preview_index: usize,
    pub policy: PolicyKind,
    pub smoothness: f64,
    pub curve_resolution: usize,
    pub main_suit_scale: f32,
    pub recolor_enabled: bool,
    pub geometry: DeckGeometry,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("assets/input1"),
            output_folder: PathBuf::from("out/deck1"),
            prefix: "poker_card".to_string(),
            card_count: DECK_SIZE,
            preview_index: DEFAULT_PREVIEW_INDEX,
            policy: PolicyKind::Recolor,
            smoothness: DEFAULT_SMOOTHNESS,
            curve_resolution: DEFAULT_CURVE_RESOLUTION,
            main_suit_scale: 1.0,
            recolor_enabled: true,
            geometry: DeckGeometry::default(),
        }
    }
}

impl GenerationConfig {
    pub fn new(
        input_folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_folder: output_folder.into(),
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Check every bound before anything touches the filesystem.
    pub fn validate(&self) -> DeckResult<()> {
        if !(1..=DECK_SIZE).contains(&self.card_count) {
            return Err(invalid(format!(
                "invalid number of cards to generate: {}. Must be between 1 and {}",
                self.card_count, DECK_SIZE
            )));
        }
        if self.preview_index >= DECK_SIZE {
            return Err(invalid(format!(
                "preview index {} is outside 0..{}",
                self.preview_index, DECK_SIZE
            )));
        }
        if !(self.smoothness.is_finite() && self.smoothness > 0.0) {
            return Err(invalid(format!(
                "smoothness must be a positive number, got {}",
                self.smoothness
            )));
        }
        if self.curve_resolution < 3 {
            return Err(invalid(format!(
                "curve resolution must be at least 3, got {}",
                self.curve_resolution
            )));
        }
        if !(self.main_suit_scale > 0.0 && self.main_suit_scale <= MAX_SUIT_SCALE) {
            return Err(invalid(format!(
                "main suit scale must be in (0, {}], got {}",
                MAX_SUIT_SCALE, self.main_suit_scale
            )));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(invalid(format!(
                "prefix '{}' must not contain path separators",
                self.prefix
            )));
        }
        let geometry = &self.geometry;
        if geometry.card_size.0 < 2
            || geometry.card_size.1 == 0
            || geometry.suit_size.0 == 0
            || geometry.suit_size.1 == 0
            || geometry.font_size == 0
        {
            return Err(invalid("card, suit, and font sizes must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Tagged suit policy derived from the flat settings.
    pub fn suit_policy(&self) -> SuitPolicy {
        match self.policy {
            PolicyKind::Recolor => SuitPolicy::Recolor {
                recolor: self.recolor_enabled,
                scale: self.main_suit_scale,
            },
            PolicyKind::Contour => SuitPolicy::ContourExtract(ContourParams {
                smoothness: self.smoothness,
                curve_resolution: self.curve_resolution,
                scale: self.main_suit_scale,
            }),
        }
    }

    /// Read a JSON config file in the external schema.
    pub fn from_json_file(path: &Path) -> DeckResult<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            invalid(format!("failed to read config {}: {}", path.display(), err))
        })?;
        Self::from_json_str(&raw)
            .map_err(|err| invalid(format!("config {}: {}", path.display(), err)))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(raw)?;
        Ok(file.into_config())
    }
}

fn invalid(message: String) -> DeckError {
    DeckError::ConfigValidation(message)
}

/// On-disk schema shared with the external settings editor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub input_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub prefix_string: Option<String>,
    #[serde(default)]
    pub app_params: AppParams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppParams {
    #[serde(rename = "Design", default)]
    pub design: DesignParams,
}

/// The `Design` block. Keys keep their human-readable spelling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignParams {
    #[serde(rename = "Preview index")]
    pub preview_index: Option<usize>,
    #[serde(rename = "main suit scale")]
    pub main_suit_scale: Option<f32>,
    #[serde(rename = "recolor main suit")]
    pub recolor_main_suit: Option<bool>,
    #[serde(rename = "card value margin")]
    pub card_value_margin: Option<u32>,
    #[serde(rename = "card value padding")]
    pub card_value_padding: Option<u32>,
    /// Accepted for compatibility; face-card artwork is not rendered.
    #[serde(rename = "main face scale")]
    pub main_face_scale: Option<f32>,
    #[serde(rename = "suit policy")]
    pub suit_policy: Option<PolicyKind>,
    #[serde(rename = "smoothness")]
    pub smoothness: Option<f64>,
    #[serde(rename = "curve resolution")]
    pub curve_resolution: Option<usize>,
    #[serde(rename = "card count")]
    pub card_count: Option<usize>,
}

impl ConfigFile {
    pub fn into_config(self) -> GenerationConfig {
        let defaults = GenerationConfig::default();
        let design = self.app_params.design;
        let mut geometry = defaults.geometry;
        if let Some(margin) = design.card_value_margin {
            geometry.corner_inset = margin;
        }
        geometry.stack_gap = design.card_value_padding;

        GenerationConfig {
            input_folder: self.input_folder.unwrap_or(defaults.input_folder),
            output_folder: self.output_folder.unwrap_or(defaults.output_folder),
            prefix: self.prefix_string.unwrap_or(defaults.prefix),
            card_count: design.card_count.unwrap_or(defaults.card_count),
            preview_index: design.preview_index.unwrap_or(defaults.preview_index),
            policy: design.suit_policy.unwrap_or(defaults.policy),
            smoothness: design.smoothness.unwrap_or(defaults.smoothness),
            curve_resolution: design.curve_resolution.unwrap_or(defaults.curve_resolution),
            main_suit_scale: design.main_suit_scale.unwrap_or(defaults.main_suit_scale),
            recolor_enabled: design.recolor_main_suit.unwrap_or(defaults.recolor_enabled),
            geometry,
        }
    }
}
