//! Procedural figures: height field + random erosion.

use rand::Rng;
use rayon::prelude::*;

use super::config::RandomFigureConfig;
use super::heightfield::HeightFieldGenerator;
use super::seeded_rng;
use crate::core::types::{GridPos, Result};
use crate::figure::{Figure, FigureOrigin, FigureParams};
use crate::grid::OccupancyGrid;

/// Generates random figures from a validated config.
#[derive(Clone, Debug)]
pub struct RandomFigureGenerator {
    config: RandomFigureConfig,
    height_field: HeightFieldGenerator,
}

impl RandomFigureGenerator {
    /// Fails with a config error on degenerate ranges or weights.
    pub fn new(config: RandomFigureConfig) -> Result<Self> {
        let height_field = HeightFieldGenerator::new(&config)?;
        Ok(Self { config, height_field })
    }

    pub fn config(&self) -> &RandomFigureConfig {
        &self.config
    }

    /// Generate one figure.
    ///
    /// Columns are filled up to the height field; every block is then
    /// eroded independently with the configured probability. Eroded
    /// positions become the hole index and the height field is kept as the
    /// relief.
    pub fn make_task<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Figure> {
        let field = self.height_field.generate(rng)?;
        let mut occupancy = OccupancyGrid::filled_to(&field.heights);

        let solid: Vec<GridPos> = occupancy.positions().collect();
        let mut holes = Vec::new();
        for pos in solid {
            if rng.random::<f64>() < self.config.erosion_probability {
                occupancy.set(pos, false);
                holes.push(pos);
            }
        }
        holes.sort();

        log::debug!(
            "random figure: {} blocks, {} eroded",
            occupancy.count(),
            holes.len()
        );

        let colors = occupancy.colored(self.config.color);
        let params = FigureParams {
            color: Some(colors.clone()),
            relief: Some(field.heights.clone()),
            ..Default::default()
        };
        let origin = FigureOrigin::Random {
            max_height: field.max_height,
            color: self.config.color,
            erosion_probability: self.config.erosion_probability,
        };
        Ok(Figure::from_parts(occupancy, colors, field.heights, holes, params, origin))
    }

    /// Generate one figure per seed in parallel; each figure draws from its
    /// own RNG, so the result for a seed does not depend on the others.
    pub fn generate_batch(&self, seeds: &[u64]) -> Result<Vec<Figure>> {
        seeds
            .par_iter()
            .map(|&seed| self.make_task(&mut seeded_rng(seed)))
            .collect()
    }
}
