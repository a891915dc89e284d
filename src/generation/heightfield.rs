//! Height fields: skewed maximum-height sampling and footprint-masked
//! per-column heights.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use super::config::RandomFigureConfig;
use super::footprint::footprint_mask;
use crate::core::error::Error;
use crate::core::types::{Result, GRID_COLS, GRID_ROWS};
use crate::grid::{ColumnMask, HeightMap};

/// Discrete distribution over maximum heights `[lo, hi)` that under-weights
/// the lowest value.
///
/// The lowest height has probability `1 / ((hi - lo) * skew)`; the remaining
/// mass is shared evenly by the other heights.
#[derive(Clone, Debug)]
pub struct HeightDistribution {
    choices: Vec<u8>,
    probabilities: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl HeightDistribution {
    pub fn new(lo: u8, hi: u8, skew: f64) -> Result<Self> {
        if hi < lo.saturating_add(2) {
            return Err(Error::Config(format!(
                "height range [{}, {}) needs at least two values",
                lo, hi
            )));
        }
        if !(skew > 0.0) {
            return Err(Error::Config(format!("skew must be positive, got {}", skew)));
        }

        let choices: Vec<u8> = (lo..hi).collect();
        let n = choices.len() as f64;
        let p = 1.0 / n;
        let bottom = p / skew;
        let rest = p + (p - bottom) / (n - 1.0);

        let mut probabilities = Vec::with_capacity(choices.len());
        probabilities.push(bottom);
        probabilities.extend(std::iter::repeat_n(rest, choices.len() - 1));
        let total: f64 = probabilities.iter().sum();
        for prob in &mut probabilities {
            *prob /= total;
        }

        let index = WeightedIndex::new(&probabilities)
            .map_err(|e| Error::Config(format!("height weights: {}", e)))?;
        Ok(Self { choices, probabilities, index })
    }

    pub fn choices(&self) -> &[u8] {
        &self.choices
    }

    /// Probability of each entry of [`choices`](Self::choices).
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        self.choices[self.index.sample(rng)]
    }
}

/// A footprint-masked height map.
#[derive(Clone, Debug)]
pub struct HeightField {
    /// Heights, zero outside the footprint.
    pub heights: HeightMap,
    pub footprint: ColumnMask,
    /// The drawn maximum; every height is below it.
    pub max_height: u8,
}

/// Draws height fields from a [`RandomFigureConfig`].
#[derive(Clone, Debug)]
pub struct HeightFieldGenerator {
    distribution: HeightDistribution,
    spread_range: (u32, u32),
    blob_count_range: (u32, u32),
}

impl HeightFieldGenerator {
    pub fn new(config: &RandomFigureConfig) -> Result<Self> {
        config.validate()?;
        let (lo, hi) = config.height_range;
        Ok(Self {
            distribution: HeightDistribution::new(lo, hi, config.skew)?,
            spread_range: config.spread_range,
            blob_count_range: config.blob_count_range,
        })
    }

    pub fn distribution(&self) -> &HeightDistribution {
        &self.distribution
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HeightField> {
        let max_height = self.distribution.sample(rng);
        let heights = HeightMap::from_fn(|_, _| rng.random_range(1..max_height));

        let center = (rng.random_range(0..GRID_ROWS), rng.random_range(0..GRID_COLS));
        let spread = rng.random_range(self.spread_range.0..self.spread_range.1) as f64 / 100.0;
        let blob_count = rng.random_range(self.blob_count_range.0..self.blob_count_range.1);
        let footprint = footprint_mask(center, spread, blob_count, rng)?;

        log::debug!(
            "height field: max height {}, footprint {} columns around {:?} (spread {:.2}, {} blobs)",
            max_height,
            footprint.count(),
            center,
            spread,
            blob_count
        );

        Ok(HeightField {
            heights: heights.masked(&footprint),
            footprint,
            max_height,
        })
    }
}
