//! Per-column relief (height) map.

use serde::{Deserialize, Serialize};

use super::{column_index, columns, ColumnMask};
use crate::core::error::Error;
use crate::core::types::{GRID_COLS, GRID_ROWS};

/// Per-column intended solid height, indexed (x, y). Values lie in `0..=9`.
///
/// Serializes as a nested `[11][11]` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct HeightMap {
    heights: Vec<u8>,
}

impl Default for HeightMap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightMap {
    pub fn new() -> Self {
        Self { heights: vec![0; GRID_ROWS * GRID_COLS] }
    }

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut map = Self::new();
        for (x, y) in columns() {
            map.heights[column_index(x, y)] = f(x, y);
        }
        map
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.heights[column_index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, height: u8) {
        self.heights[column_index(x, y)] = height;
    }

    /// Tallest column.
    pub fn max(&self) -> u8 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all column heights.
    pub fn total(&self) -> usize {
        self.heights.iter().map(|&h| h as usize).sum()
    }

    /// Columns with nonzero height, ascending (x, y).
    pub fn nonzero_columns(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        columns().filter(move |&(x, y)| self.get(x, y) > 0)
    }

    /// Zero every column outside `mask`.
    pub fn masked(&self, mask: &ColumnMask) -> Self {
        Self::from_fn(|x, y| if mask.get(x, y) { self.get(x, y) } else { 0 })
    }
}

impl TryFrom<Vec<Vec<u8>>> for HeightMap {
    type Error = Error;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        if rows.len() != GRID_ROWS || rows.iter().any(|r| r.len() != GRID_COLS) {
            return Err(Error::DataLoad(format!(
                "height map must be {}x{}",
                GRID_ROWS, GRID_COLS
            )));
        }
        Ok(Self { heights: rows.into_iter().flatten().collect() })
    }
}

impl From<HeightMap> for Vec<Vec<u8>> {
    fn from(map: HeightMap) -> Self {
        map.heights.chunks(GRID_COLS).map(|r| r.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_map_basics() {
        let mut map = HeightMap::new();
        assert_eq!(map.max(), 0);
        map.set(2, 3, 5);
        map.set(7, 1, 2);
        assert_eq!(map.get(2, 3), 5);
        assert_eq!(map.max(), 5);
        assert_eq!(map.total(), 7);
        assert_eq!(map.nonzero_columns().collect::<Vec<_>>(), vec![(2, 3), (7, 1)]);
    }

    #[test]
    fn test_masked() {
        let map = HeightMap::from_fn(|_, _| 4);
        let mut mask = ColumnMask::new();
        mask.set(0, 0, true);
        let masked = map.masked(&mask);
        assert_eq!(masked.total(), 4);
        assert_eq!(masked.get(0, 0), 4);
    }
}
