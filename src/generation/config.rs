//! Generator configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, GRID_HEIGHT, MAX_COLOR};

/// Configuration for procedural (random) figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomFigureConfig {
    /// Half-open range `[lo, hi)` the maximum figure height is drawn from.
    pub height_range: (u8, u8),
    /// Half-open range of the footprint spread, in hundredths of a cell.
    pub spread_range: (u32, u32),
    /// Half-open range of the number of footprint blobs.
    pub blob_count_range: (u32, u32),
    /// Palette color painted on every block.
    pub color: i32,
    /// How strongly the lowest height is under-weighted.
    pub skew: f64,
    /// Per-block probability of being eroded into a hole.
    pub erosion_probability: f64,
}

impl Default for RandomFigureConfig {
    fn default() -> Self {
        Self {
            height_range: (3, 8),
            spread_range: (95, 160),
            blob_count_range: (15, 30),
            color: 1,
            skew: 5.0,
            erosion_probability: 0.01,
        }
    }
}

impl RandomFigureConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.height_range;
        if lo < 2 {
            return Err(Error::Config(format!(
                "height range lower bound must be at least 2, got {}",
                lo
            )));
        }
        if hi < lo.saturating_add(2) {
            return Err(Error::Config(format!(
                "height range [{}, {}) needs at least two values",
                lo, hi
            )));
        }
        if hi as usize > GRID_HEIGHT + 1 {
            return Err(Error::Config(format!(
                "height range upper bound {} exceeds grid height {}",
                hi, GRID_HEIGHT
            )));
        }
        if !(self.skew > 0.0) {
            return Err(Error::Config(format!("skew must be positive, got {}", self.skew)));
        }
        if !(0.0..1.0).contains(&self.erosion_probability) {
            return Err(Error::Config(format!(
                "erosion probability must lie in [0, 1), got {}",
                self.erosion_probability
            )));
        }
        if self.spread_range.0 == 0 || self.spread_range.0 >= self.spread_range.1 {
            return Err(Error::Config(format!(
                "spread range {:?} must be non-empty and positive",
                self.spread_range
            )));
        }
        if self.blob_count_range.0 >= self.blob_count_range.1 {
            return Err(Error::Config(format!(
                "blob count range {:?} is empty",
                self.blob_count_range
            )));
        }
        if !(1..=MAX_COLOR).contains(&self.color) {
            return Err(Error::Config(format!(
                "color {} outside palette 1..={}",
                self.color, MAX_COLOR
            )));
        }
        Ok(())
    }
}

/// Configuration for corpus-driven figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub targets_path: PathBuf,
    pub names_path: PathBuf,
    pub instructions_path: PathBuf,
    /// Run the predictor on each instruction instead of using ground truth.
    pub use_dialogue: bool,
    /// Always replay this corpus index from `make_task`.
    pub main_figure: Option<usize>,
    /// Corpora are truncated to this many entries.
    pub max_entries: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            targets_path: PathBuf::from("dialogue/augmented_targets.json"),
            names_path: PathBuf::from("dialogue/augmented_target_name.json"),
            instructions_path: PathBuf::from("dialogue/augmented_chats.json"),
            use_dialogue: true,
            main_figure: None,
            max_entries: 300,
        }
    }
}

impl DatasetConfig {
    /// Config whose three corpus files live in `dir` under their default names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            targets_path: dir.join("augmented_targets.json"),
            names_path: dir.join("augmented_target_name.json"),
            instructions_path: dir.join("augmented_chats.json"),
            ..Default::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
