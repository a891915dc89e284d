//! 2D column masks (structure footprints).

use super::{column_index, columns};
use crate::core::types::{GRID_COLS, GRID_ROWS};

/// Boolean mask over (x, y) columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMask {
    cells: Vec<bool>,
}

impl Default for ColumnMask {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnMask {
    pub fn new() -> Self {
        Self { cells: vec![false; GRID_ROWS * GRID_COLS] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[column_index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.cells[column_index(x, y)] = value;
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Marked columns, ascending (x, y).
    pub fn marked(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        columns().filter(move |&(x, y)| self.get(x, y))
    }

    /// True if all marked columns form one 4-connected region.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.marked().next() else {
            return true;
        };
        let mut seen = ColumnMask::new();
        let mut stack = vec![start];
        seen.set(start.0, start.1, true);
        let mut reached = 0;
        while let Some((x, y)) = stack.pop() {
            reached += 1;
            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if nx < GRID_ROWS && ny < GRID_COLS && self.get(nx, ny) && !seen.get(nx, ny) {
                    seen.set(nx, ny, true);
                    stack.push((nx, ny));
                }
            }
        }
        reached == self.count()
    }
}
