//! Fixed-size voxel grids and per-column maps.
//!
//! All grids share the task area dimensions: 9 layers high, 11 rows (x)
//! and 11 columns (y). Three-dimensional grids are indexed (z, x, y);
//! two-dimensional maps are indexed (x, y).

pub mod voxel_grid;
pub mod height_map;
pub mod mask;

pub use voxel_grid::{OccupancyGrid, VoxelGrid};
pub use height_map::HeightMap;
pub use mask::ColumnMask;

/// Flat index of a (z, x, y) cell.
#[inline]
pub(crate) fn cell_index(z: usize, x: usize, y: usize) -> usize {
    use crate::core::types::{GRID_COLS, GRID_ROWS};
    (z * GRID_ROWS + x) * GRID_COLS + y
}

/// Flat index of an (x, y) column.
#[inline]
pub(crate) fn column_index(x: usize, y: usize) -> usize {
    x * crate::core::types::GRID_COLS + y
}

/// Iterate all (x, y) columns in ascending row-major order.
pub fn columns() -> impl Iterator<Item = (usize, usize)> {
    use crate::core::types::{GRID_COLS, GRID_ROWS};
    (0..GRID_ROWS).flat_map(|x| (0..GRID_COLS).map(move |y| (x, y)))
}
