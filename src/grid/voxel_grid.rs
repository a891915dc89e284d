//! Dense 3D grids: colored voxels and boolean occupancy.

use serde::{Deserialize, Serialize};

use super::{cell_index, HeightMap};
use crate::core::error::Error;
use crate::core::types::{GridPos, GRID_CELLS, GRID_COLS, GRID_HEIGHT, GRID_ROWS, EMPTY, MAX_COLOR};

type Nested = Vec<Vec<Vec<i32>>>;

/// Colored voxel grid. 0 = empty, positive = color id, -1 = removal marker.
///
/// Serializes as a nested `[9][11][11]` integer array.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Nested", into = "Nested")]
pub struct VoxelGrid {
    cells: Vec<i32>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("nonzero", &self.count_nonzero())
            .finish()
    }
}

impl VoxelGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self { cells: vec![EMPTY; GRID_CELLS] }
    }

    /// Build a grid by evaluating `f(z, x, y)` for every cell.
    pub fn from_fn(mut f: impl FnMut(usize, usize, usize) -> i32) -> Self {
        let mut grid = Self::new();
        for z in 0..GRID_HEIGHT {
            for x in 0..GRID_ROWS {
                for y in 0..GRID_COLS {
                    grid.cells[cell_index(z, x, y)] = f(z, x, y);
                }
            }
        }
        grid
    }

    /// Grid with exactly one nonzero cell.
    pub fn single(pos: GridPos, value: i32) -> Self {
        let mut grid = Self::new();
        grid.set(pos, value);
        grid
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> i32 {
        self.cells[cell_index(pos.z, pos.x, pos.y)]
    }

    #[inline]
    pub fn at(&self, z: usize, x: usize, y: usize) -> i32 {
        self.cells[cell_index(z, x, y)]
    }

    #[inline]
    pub fn set(&mut self, pos: GridPos, value: i32) {
        self.cells[cell_index(pos.z, pos.x, pos.y)] = value;
    }

    /// Raw cells in (z, x, y) row-major order.
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    /// All cells with their positions, in (z, x, y) order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, i32)> + '_ {
        (0..GRID_HEIGHT).flat_map(move |z| {
            (0..GRID_ROWS).flat_map(move |x| {
                (0..GRID_COLS).map(move |y| (GridPos::new(z, x, y), self.at(z, x, y)))
            })
        })
    }

    /// Positions and values of every nonzero cell.
    pub fn nonzero(&self) -> impl Iterator<Item = (GridPos, i32)> + '_ {
        self.iter().filter(|&(_, v)| v != EMPTY)
    }

    pub fn count_nonzero(&self) -> usize {
        self.cells.iter().filter(|&&v| v != EMPTY).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&v| v == EMPTY)
    }

    /// Occupancy of this grid: any positive cell is solid.
    pub fn binarize(&self) -> OccupancyGrid {
        OccupancyGrid {
            cells: self.cells.iter().map(|&v| v > 0).collect(),
        }
    }

    /// Shift content by +1 along both horizontal axes; the last row and
    /// column fall off, the first row and column become empty.
    pub fn shifted_horizontal(&self) -> Self {
        Self::from_fn(|z, x, y| {
            if x == 0 || y == 0 {
                EMPTY
            } else {
                self.at(z, x - 1, y - 1)
            }
        })
    }

    /// Copy of this grid with every cell outside `mask` cleared.
    pub fn masked_by(&self, mask: &OccupancyGrid) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .zip(mask.cells.iter())
                .map(|(&v, &keep)| if keep { v } else { EMPTY })
                .collect(),
        }
    }

    /// Cells whose value is not a valid target color in `[0, MAX_COLOR]`.
    ///
    /// Removal markers count as invalid here: they only belong in subtask
    /// grids, never in a target.
    pub fn out_of_palette(&self) -> Vec<(GridPos, i32)> {
        self.iter()
            .filter(|&(_, v)| !(EMPTY..=MAX_COLOR).contains(&v))
            .collect()
    }
}

impl TryFrom<Nested> for VoxelGrid {
    type Error = Error;

    fn try_from(nested: Nested) -> Result<Self, Self::Error> {
        if nested.len() != GRID_HEIGHT {
            return Err(Error::DataLoad(format!(
                "voxel grid has {} layers, expected {}",
                nested.len(),
                GRID_HEIGHT
            )));
        }
        let mut cells = Vec::with_capacity(GRID_CELLS);
        for (z, layer) in nested.into_iter().enumerate() {
            if layer.len() != GRID_ROWS {
                return Err(Error::DataLoad(format!(
                    "layer {} has {} rows, expected {}",
                    z,
                    layer.len(),
                    GRID_ROWS
                )));
            }
            for (x, row) in layer.into_iter().enumerate() {
                if row.len() != GRID_COLS {
                    return Err(Error::DataLoad(format!(
                        "row ({}, {}) has {} cells, expected {}",
                        z,
                        x,
                        row.len(),
                        GRID_COLS
                    )));
                }
                cells.extend(row);
            }
        }
        Ok(Self { cells })
    }
}

impl From<VoxelGrid> for Nested {
    fn from(grid: VoxelGrid) -> Self {
        grid.cells
            .chunks(GRID_ROWS * GRID_COLS)
            .map(|layer| layer.chunks(GRID_COLS).map(|row| row.to_vec()).collect())
            .collect()
    }
}

/// Boolean occupancy grid.
#[derive(Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: Vec<bool>,
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OccupancyGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancyGrid")
            .field("solid", &self.count())
            .finish()
    }
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self { cells: vec![false; GRID_CELLS] }
    }

    /// Grid that is solid below `heights` in every column.
    pub fn filled_to(heights: &HeightMap) -> Self {
        let mut grid = Self::new();
        for z in 0..GRID_HEIGHT {
            for x in 0..GRID_ROWS {
                for y in 0..GRID_COLS {
                    grid.cells[cell_index(z, x, y)] = z < heights.get(x, y) as usize;
                }
            }
        }
        grid
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> bool {
        self.cells[cell_index(pos.z, pos.x, pos.y)]
    }

    #[inline]
    pub fn at(&self, z: usize, x: usize, y: usize) -> bool {
        self.cells[cell_index(z, x, y)]
    }

    #[inline]
    pub fn set(&mut self, pos: GridPos, solid: bool) {
        self.cells[cell_index(pos.z, pos.x, pos.y)] = solid;
    }

    /// Number of solid cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Number of solid cells in column (x, y).
    pub fn column_count(&self, x: usize, y: usize) -> usize {
        (0..GRID_HEIGHT).filter(|&z| self.at(z, x, y)).count()
    }

    /// Solid positions in (z, x, y) order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..GRID_HEIGHT).flat_map(move |z| {
            (0..GRID_ROWS).flat_map(move |x| {
                (0..GRID_COLS)
                    .filter(move |&y| self.at(z, x, y))
                    .map(move |y| GridPos::new(z, x, y))
            })
        })
    }

    /// Positions solid in `self` but empty in `other`.
    pub fn difference(&self, other: &OccupancyGrid) -> Vec<GridPos> {
        self.positions().filter(|&p| !other.get(p)).collect()
    }

    /// Paint every solid cell with `color`.
    pub fn colored(&self, color: i32) -> VoxelGrid {
        VoxelGrid {
            cells: self.cells.iter().map(|&c| if c { color } else { EMPTY }).collect(),
        }
    }
}
