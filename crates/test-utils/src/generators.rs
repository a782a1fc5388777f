//! Synthetic radar grid generators.
//!
//! Grids hold raw values as stored in the radar files: hundredths of a
//! millimetre accumulated over five minutes, with 65535 marking cells outside
//! radar coverage.

use ndarray::Array2;

/// Raw value marking no radar coverage.
pub const NO_COVERAGE: u16 = 65535;

/// Grid filled with a single raw value.
pub fn uniform_grid(height: usize, width: usize, value: u16) -> Array2<u16> {
    Array2::from_elem((height, width), value)
}

/// Grid with predictable values: `row * 100 + col`.
///
/// ```
/// use test_utils::indexed_grid;
///
/// let grid = indexed_grid(3, 4);
/// assert_eq!(grid[[0, 1]], 1);
/// assert_eq!(grid[[2, 3]], 203);
/// ```
pub fn indexed_grid(height: usize, width: usize) -> Array2<u16> {
    Array2::from_shape_fn((height, width), |(r, c)| (r * 100 + c) as u16)
}

/// Uniform grid whose cells outside a centred disc of `radius` cells carry
/// the no-coverage sentinel, like a single radar's circular footprint.
pub fn radar_disc_grid(height: usize, width: usize, radius: f64, value: u16) -> Array2<u16> {
    let cy = (height as f64 - 1.0) / 2.0;
    let cx = (width as f64 - 1.0) / 2.0;
    Array2::from_shape_fn((height, width), |(r, c)| {
        let dy = r as f64 - cy;
        let dx = c as f64 - cx;
        if (dy * dy + dx * dx).sqrt() <= radius {
            value
        } else {
            NO_COVERAGE
        }
    })
}

/// Copy of `grid` with the given cells set to the no-coverage sentinel.
pub fn with_gaps(grid: &Array2<u16>, cells: &[(usize, usize)]) -> Array2<u16> {
    let mut out = grid.clone();
    for &cell in cells {
        out[cell] = NO_COVERAGE;
    }
    out
}

/// Multiply every covered cell by `factor`, leaving sentinel cells alone.
pub fn scale_covered(grid: &Array2<u16>, factor: u16) -> Array2<u16> {
    grid.mapv(|v| if v == NO_COVERAGE { v } else { v * factor })
}
