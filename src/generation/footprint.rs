//! Footprint masks: connected, roughly circular sets of columns.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::core::error::Error;
use crate::core::types::{Result, GRID_COLS, GRID_ROWS};
use crate::grid::ColumnMask;

/// Generate a connected footprint around `center`.
///
/// Each blob samples a normally distributed offset (standard deviation
/// `spread`, in cells) from the center and marks the 4-connected path from
/// the center to it, so the mask always contains the center and stays
/// connected.
pub fn footprint_mask<R: Rng + ?Sized>(
    center: (usize, usize),
    spread: f64,
    blob_count: u32,
    rng: &mut R,
) -> Result<ColumnMask> {
    let (cx, cy) = center;
    if cx >= GRID_ROWS || cy >= GRID_COLS {
        return Err(Error::Config(format!("footprint center {:?} outside grid", center)));
    }
    if !(spread >= 0.0 && spread.is_finite()) {
        return Err(Error::Config(format!("footprint spread must be non-negative, got {}", spread)));
    }
    let normal = Normal::new(0.0, spread)
        .map_err(|e| Error::Config(format!("footprint spread {}: {}", spread, e)))?;

    let mut mask = ColumnMask::new();
    mask.set(cx, cy, true);
    for _ in 0..blob_count {
        let tx = clamp_axis(cx as f64 + normal.sample(rng), GRID_ROWS);
        let ty = clamp_axis(cy as f64 + normal.sample(rng), GRID_COLS);
        mark_path(&mut mask, (cx, cy), (tx, ty));
    }
    Ok(mask)
}

fn clamp_axis(value: f64, len: usize) -> usize {
    value.round().clamp(0.0, (len - 1) as f64) as usize
}

/// Mark a 4-connected staircase from `from` to `to`, stepping along the axis
/// with the larger remaining distance.
fn mark_path(mask: &mut ColumnMask, from: (usize, usize), to: (usize, usize)) {
    let (mut x, mut y) = from;
    mask.set(x, y, true);
    while (x, y) != to {
        let dx = to.0 as i64 - x as i64;
        let dy = to.1 as i64 - y as i64;
        if dx.abs() >= dy.abs() {
            x = (x as i64 + dx.signum()) as usize;
        } else {
            y = (y as i64 + dy.signum()) as usize;
        }
        mask.set(x, y, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::seeded_rng;

    #[test]
    fn test_footprint_contains_center_and_is_connected() {
        for seed in 0..50 {
            let mut rng = seeded_rng(seed);
            let mask = footprint_mask((3, 7), 1.3, 20, &mut rng).unwrap();
            assert!(mask.get(3, 7));
            assert!(mask.is_connected(), "seed {} produced a split footprint", seed);
        }
    }

    #[test]
    fn test_zero_blobs_is_single_column() {
        let mut rng = seeded_rng(1);
        let mask = footprint_mask((0, 10), 1.0, 0, &mut rng).unwrap();
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_corner_center_stays_in_grid() {
        let mut rng = seeded_rng(9);
        let mask = footprint_mask((10, 10), 4.0, 30, &mut rng).unwrap();
        assert!(mask.get(10, 10));
        assert!(mask.is_connected());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mut rng = seeded_rng(0);
        assert!(footprint_mask((11, 0), 1.0, 5, &mut rng).is_err());
        assert!(footprint_mask((5, 5), -1.0, 5, &mut rng).is_err());
    }

    #[test]
    fn test_negative_or_nan_spread_is_config_error() {
        let mut rng = seeded_rng(0);
        assert!(matches!(footprint_mask((5, 5), -0.5, 5, &mut rng), Err(Error::Config(_))));
        assert!(matches!(footprint_mask((5, 5), f64::NAN, 5, &mut rng), Err(Error::Config(_))));
        assert!(footprint_mask((5, 5), 0.0, 5, &mut rng).is_ok());
    }

    #[test]
    fn test_mark_path() {
        let mut mask = ColumnMask::new();
        mark_path(&mut mask, (2, 2), (5, 0));
        assert!(mask.get(2, 2));
        assert!(mask.get(5, 0));
        assert!(mask.is_connected());
        assert_eq!(mask.count(), 6);
    }
}
