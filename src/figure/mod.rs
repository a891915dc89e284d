//! Canonicalized build targets.
//!
//! A [`Figure`] is immutable once built. It owns the occupancy grid, the
//! color grid, the per-column relief and the hole index (sorted by
//! x, y, z), plus a parameter record describing where it came from.

pub mod morphology;
pub mod canonical;

pub use canonical::{canonicalize, Canonical, FigureBuilder};
pub use morphology::{relief_extract, support_filter, ReliefLayers};

use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, GRID_HEIGHT};
use crate::grid::{HeightMap, OccupancyGrid, VoxelGrid};

/// Optional descriptive fields attached to a figure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureParams {
    /// Corpus name of the target.
    pub name: Option<String>,
    /// Unshifted ground-truth grid as stored in the corpus.
    pub original: Option<VoxelGrid>,
    /// Color grid the figure was built from.
    pub color: Option<VoxelGrid>,
    pub relief: Option<HeightMap>,
    /// Whether the predicted grid matched the ground truth.
    pub right_predicted: Option<bool>,
    /// Whether canonicalization dropped unsupported voxels.
    #[serde(default)]
    pub support_changed: bool,
}

/// How a figure was produced.
#[derive(Clone, Debug, PartialEq)]
pub enum FigureOrigin {
    /// Procedural height field with random erosion.
    Random {
        /// Maximum height drawn for the height field (exclusive).
        max_height: u8,
        color: i32,
        erosion_probability: f64,
    },
    /// Loaded from the target corpus.
    DatasetDriven {
        index: usize,
    },
    /// Supplied directly by the caller.
    Provided,
}

/// A canonicalized voxel target.
#[derive(Clone, Debug)]
pub struct Figure {
    occupancy: OccupancyGrid,
    colors: VoxelGrid,
    relief: HeightMap,
    holes: Vec<GridPos>,
    params: FigureParams,
    origin: FigureOrigin,
}

impl Figure {
    /// Canonicalize a colored grid into a figure.
    pub fn from_colored(grid: VoxelGrid, origin: FigureOrigin) -> Self {
        let canonical = canonicalize(&grid);
        let params = FigureParams {
            color: Some(canonical.colors.clone()),
            relief: Some(canonical.relief.clone()),
            support_changed: canonical.support_changed,
            ..Default::default()
        };
        Self::from_parts(
            canonical.occupancy,
            canonical.colors,
            canonical.relief,
            canonical.holes,
            params,
            origin,
        )
    }

    pub(crate) fn from_parts(
        occupancy: OccupancyGrid,
        colors: VoxelGrid,
        relief: HeightMap,
        mut holes: Vec<GridPos>,
        params: FigureParams,
        origin: FigureOrigin,
    ) -> Self {
        holes.sort();
        Self { occupancy, colors, relief, holes, params, origin }
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    pub fn colors(&self) -> &VoxelGrid {
        &self.colors
    }

    pub fn relief(&self) -> &HeightMap {
        &self.relief
    }

    /// Hole index, sorted by (x, y, z).
    pub fn holes(&self) -> &[GridPos] {
        &self.holes
    }

    pub fn params(&self) -> &FigureParams {
        &self.params
    }

    pub fn origin(&self) -> &FigureOrigin {
        &self.origin
    }

    /// Hole heights in column (x, y), ascending.
    pub fn holes_in_column(&self, x: usize, y: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.holes.partition_point(|h| (h.x, h.y) < (x, y));
        self.holes[start..]
            .iter()
            .take_while(move |h| h.x == x && h.y == y)
            .map(|h| h.z)
    }

    /// Number of holes in each column.
    pub fn hole_counts(&self) -> HeightMap {
        HeightMap::from_fn(|x, y| self.holes_in_column(x, y).count() as u8)
    }

    /// Holes that do not lie below the relief of their column.
    pub fn stray_holes(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.holes
            .iter()
            .copied()
            .filter(|h| h.z >= self.relief.get(h.x, h.y) as usize)
    }

    /// Check the relief/hole/occupancy invariant for every column.
    pub fn is_consistent(&self) -> bool {
        crate::grid::columns().all(|(x, y)| {
            let height = self.relief.get(x, y) as usize;
            (0..GRID_HEIGHT).all(|z| {
                let solid = self.occupancy.at(z, x, y);
                if z >= height {
                    !solid
                } else {
                    let is_hole = self.holes_in_column(x, y).any(|hz| hz == z);
                    solid != is_hole
                }
            })
        })
    }
}
