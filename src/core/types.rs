//! Core type aliases, grid dimensions and coordinate conventions

pub use glam::IVec3;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Number of vertical layers (z axis).
pub const GRID_HEIGHT: usize = 9;
/// Number of rows (x axis).
pub const GRID_ROWS: usize = 11;
/// Number of columns (y axis).
pub const GRID_COLS: usize = 11;

/// Total cell count of a voxel grid.
pub const GRID_CELLS: usize = GRID_HEIGHT * GRID_ROWS * GRID_COLS;

/// Grid-to-world offset applied to emitted placement deltas, as (x, z, y).
pub const ORIGIN_SHIFT_X: i32 = 5;
pub const ORIGIN_SHIFT_Z: i32 = 1;
pub const ORIGIN_SHIFT_Y: i32 = 5;

/// Empty cell.
pub const EMPTY: i32 = 0;
/// Removal / window marker, only meaningful in subtask grids.
pub const REMOVE_MARKER: i32 = -1;
/// Color used when a target cell carries no color information.
pub const DEFAULT_COLOR: i32 = 1;
/// Highest palette color id.
pub const MAX_COLOR: i32 = 6;

/// A cell position inside a voxel grid, stored in (z, x, y) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GridPos {
    pub z: usize,
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const fn new(z: usize, x: usize, y: usize) -> Self {
        Self { z, x, y }
    }

    /// Column-major ordering key: (x, y, z). Hole indices are sorted by it.
    pub fn column_key(&self) -> (usize, usize, usize) {
        (self.x, self.y, self.z)
    }

    /// True if the position lies inside the grid.
    pub fn in_bounds(&self) -> bool {
        self.z < GRID_HEIGHT && self.x < GRID_ROWS && self.y < GRID_COLS
    }
}

impl PartialOrd for GridPos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GridPos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.column_key().cmp(&other.column_key())
    }
}
