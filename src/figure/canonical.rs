//! Canonicalization: colored voxel grid -> occupancy, relief and hole index.
//!
//! Pipeline:
//! 1. Binarize (nonzero -> solid)
//! 2. Support filter (drop voxels with no grounded voxel below them)
//! 3. Relief projection of the filtered grid
//! 4. Holes = cells solid in the relief fill but empty in the filtered grid
//! 5. Sort holes by (x, y, z)
//! 6. Per-column hole counts (relief minus solid cells)

use super::morphology::{relief_extract, support_filter};
use super::{Figure, FigureOrigin, FigureParams};
use crate::core::error::Error;
use crate::core::types::{GridPos, Result};
use crate::grid::{HeightMap, OccupancyGrid, VoxelGrid};

/// Output of the canonicalization pipeline.
#[derive(Clone, Debug)]
pub struct Canonical {
    pub occupancy: OccupancyGrid,
    /// Input colors restricted to the voxels that survived the support filter.
    pub colors: VoxelGrid,
    pub relief: HeightMap,
    pub holes: Vec<GridPos>,
    /// Number of holes in each column.
    pub column_holes: HeightMap,
    /// Cells of the input outside the palette.
    pub palette_violations: usize,
    /// True if the support filter removed any voxel.
    pub support_changed: bool,
}

/// Run the full pipeline on a colored grid.
pub fn canonicalize(colored: &VoxelGrid) -> Canonical {
    let bad = colored.out_of_palette();
    if !bad.is_empty() {
        log::warn!(
            "{} cells outside the palette range, first at {:?} = {}",
            bad.len(),
            bad[0].0,
            bad[0].1
        );
    }

    let palette_violations = bad.len();

    let raw = colored.binarize();
    let (support_changed, occupancy) = support_filter(&raw);
    if support_changed {
        log::warn!(
            "support filter removed {} unsupported voxels",
            raw.count() - occupancy.count()
        );
    }

    let (_, relief) = relief_extract(&occupancy);
    let fill = OccupancyGrid::filled_to(&relief);
    let mut holes = fill.difference(&occupancy);
    holes.sort();
    let column_holes = HeightMap::from_fn(|x, y| {
        relief.get(x, y).saturating_sub(occupancy.column_count(x, y) as u8)
    });

    log::debug!(
        "canonicalized figure: {} voxels, max relief {}, {} holes",
        occupancy.count(),
        relief.max(),
        holes.len()
    );

    Canonical {
        colors: colored.masked_by(&occupancy),
        occupancy,
        relief,
        holes,
        column_holes,
        palette_violations,
        support_changed,
    }
}

/// Two-step figure construction: set the raw colored grid, then canonicalize.
#[derive(Clone, Debug)]
pub struct FigureBuilder {
    raw: Option<VoxelGrid>,
    origin: FigureOrigin,
    params: FigureParams,
}

impl FigureBuilder {
    pub fn new(origin: FigureOrigin) -> Self {
        Self {
            raw: None,
            origin,
            params: FigureParams::default(),
        }
    }

    /// Set the raw colored grid.
    pub fn raw(mut self, grid: VoxelGrid) -> Self {
        self.raw = Some(grid);
        self
    }

    /// Seed the parameter record; canonicalization fills in color, relief
    /// and the support flag.
    pub fn params(mut self, params: FigureParams) -> Self {
        self.params = params;
        self
    }

    /// Canonicalize the raw grid into a [`Figure`].
    ///
    /// Fails with [`Error::InvalidState`] if no raw grid was set.
    pub fn build(self) -> Result<Figure> {
        let raw = self.raw.ok_or_else(|| {
            Error::InvalidState("figure is not initialized: set a raw grid before canonicalizing".into())
        })?;
        let canonical = canonicalize(&raw);
        let mut params = self.params;
        params.color = Some(canonical.colors.clone());
        params.relief = Some(canonical.relief.clone());
        params.support_changed = canonical.support_changed;
        Ok(Figure::from_parts(
            canonical.occupancy,
            canonical.colors,
            canonical.relief,
            canonical.holes,
            params,
            self.origin,
        ))
    }
}
