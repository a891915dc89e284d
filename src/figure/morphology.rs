//! Morphological passes over occupancy grids: support filtering and relief
//! projection.

use crate::core::types::{GridPos, GRID_COLS, GRID_HEIGHT, GRID_ROWS};
use crate::grid::{columns, ColumnMask, HeightMap, OccupancyGrid};

/// One solid/empty plane per layer, bottom to top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReliefLayers {
    planes: Vec<ColumnMask>,
}

impl ReliefLayers {
    /// Plane of layer `z`.
    pub fn layer(&self, z: usize) -> &ColumnMask {
        &self.planes[z]
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Number of solid cells in column (x, y) across all layers.
    pub fn column_solid(&self, x: usize, y: usize) -> usize {
        self.planes.iter().filter(|p| p.get(x, y)).count()
    }
}

/// Remove voxels that are not supported from below.
///
/// A voxel at `z = 0` supports itself; a voxel higher up is supported when
/// some supported voxel lies below it in the same column. Gaps inside a
/// grounded column are allowed. Returns whether anything was removed along
/// with the filtered grid.
pub fn support_filter(grid: &OccupancyGrid) -> (bool, OccupancyGrid) {
    let mut filtered = grid.clone();
    let mut changed = false;
    for (x, y) in columns() {
        let mut supported = false;
        for z in 0..GRID_HEIGHT {
            let pos = GridPos::new(z, x, y);
            if !grid.get(pos) {
                continue;
            }
            if z == 0 {
                supported = true;
            }
            if !supported {
                filtered.set(pos, false);
                changed = true;
            }
        }
    }
    (changed, filtered)
}

/// Project a 3D occupancy grid onto per-layer planes and a per-column height.
///
/// The height of a column is the highest layer index (1-based) holding a
/// solid voxel, or 0 for an empty column.
pub fn relief_extract(grid: &OccupancyGrid) -> (ReliefLayers, HeightMap) {
    let mut planes = Vec::with_capacity(GRID_HEIGHT);
    let mut heights = HeightMap::new();
    for z in 0..GRID_HEIGHT {
        let layer_index = (z + 1) as u8;
        let mut plane = ColumnMask::new();
        for x in 0..GRID_ROWS {
            for y in 0..GRID_COLS {
                if grid.at(z, x, y) {
                    plane.set(x, y, true);
                    if heights.get(x, y) < layer_index {
                        heights.set(x, y, layer_index);
                    }
                }
            }
        }
        planes.push(plane);
    }
    (ReliefLayers { planes }, heights)
}
