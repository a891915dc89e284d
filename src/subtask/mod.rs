//! Decomposition of a figure into an ordered stream of single-block
//! build/remove steps.
//!
//! Columns with nonzero relief are visited in ascending (x, y) order. Each
//! column is first built solid up to its relief. If the column has holes,
//! a temporary scaffold tower is raised at the column offset by (+2, +2)
//! to reach each hole, the hole is carved out with a removal marker, and
//! once every hole is done the scaffold is taken down in reverse order.
//! Columns too close to the high-index edges to host a scaffold keep their
//! holes filled.

mod decompose;

pub use decompose::{target_to_subtasks, Subtasks, SCAFFOLD_OFFSET};

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{
    GridPos, EMPTY, ORIGIN_SHIFT_X, ORIGIN_SHIFT_Y, ORIGIN_SHIFT_Z, REMOVE_MARKER,
};
use crate::grid::VoxelGrid;

/// Where a single block goes, relative to the structure origin, and what
/// happens there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementDelta {
    /// (dx, dz, dy): x is the row offset, y the height offset, z the column offset.
    pub offset: IVec3,
    /// Positive color id to place, or -1 to remove.
    pub marker: i32,
}

impl PlacementDelta {
    pub fn from_grid(pos: GridPos, marker: i32) -> Self {
        Self {
            offset: IVec3::new(
                pos.x as i32 - ORIGIN_SHIFT_X,
                pos.z as i32 - ORIGIN_SHIFT_Z,
                pos.y as i32 - ORIGIN_SHIFT_Y,
            ),
            marker,
        }
    }

    /// `(dx, dz, dy, marker)`.
    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.offset.x, self.offset.y, self.offset.z, self.marker)
    }

    /// Grid cell this delta addresses, if it lies inside the grid.
    pub fn grid_position(&self) -> Option<GridPos> {
        let x = usize::try_from(self.offset.x + ORIGIN_SHIFT_X).ok()?;
        let z = usize::try_from(self.offset.y + ORIGIN_SHIFT_Z).ok()?;
        let y = usize::try_from(self.offset.z + ORIGIN_SHIFT_Y).ok()?;
        let pos = GridPos::new(z, x, y);
        pos.in_bounds().then_some(pos)
    }

    pub fn is_removal(&self) -> bool {
        self.marker == REMOVE_MARKER
    }
}

/// Role of a step within its column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubtaskKind {
    /// Part of the target structure.
    Build,
    /// Temporary scaffold block.
    Scaffold,
    /// Carves a hole out of the structure.
    Window,
    /// Removes a scaffold block.
    Retract,
}

/// One step: the delta plus a grid holding just that block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subtask {
    pub delta: PlacementDelta,
    /// Exactly one nonzero cell, equal to `delta.marker`.
    pub grid: VoxelGrid,
}

impl Subtask {
    pub fn new(pos: GridPos, marker: i32) -> Self {
        Self {
            delta: PlacementDelta::from_grid(pos, marker),
            grid: VoxelGrid::single(pos, marker),
        }
    }

    /// Grid cell of the single block.
    pub fn position(&self) -> Option<GridPos> {
        self.delta.grid_position()
    }
}

/// Apply a stream of subtasks to an empty grid: positive markers place a
/// block of that color, removal markers clear the cell.
pub fn replay(subtasks: impl IntoIterator<Item = Subtask>) -> VoxelGrid {
    let mut grid = VoxelGrid::new();
    for subtask in subtasks {
        let Some(pos) = subtask.position() else {
            log::warn!("subtask {:?} lies outside the grid", subtask.delta);
            continue;
        };
        let value = if subtask.delta.is_removal() { EMPTY } else { subtask.delta.marker };
        grid.set(pos, value);
    }
    grid
}
