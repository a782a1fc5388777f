//! Spline zoom for rescaling radar grids.
//!
//! Resamples a 2-D grid by a fixed factor on both axes. Output corners map
//! onto input corners, so output sample `o` reads input coordinate
//! `o * (in - 1) / (out - 1)`. The cubic path fits an interpolating cubic
//! B-spline (mirror-symmetric boundaries) before evaluation, so a factor of
//! 1.0 returns the input unchanged.

use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis};
use serde::{Deserialize, Serialize};

/// Spline order used when rescaling grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplineOrder {
    /// First order (linear in each axis).
    Linear,
    /// Third order B-spline.
    #[default]
    Cubic,
}

impl SplineOrder {
    /// Parse from string (case-insensitive), `None` if unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" | "bilinear" | "1" => Some(Self::Linear),
            "cubic" | "bicubic" | "3" => Some(Self::Cubic),
            _ => None,
        }
    }

    /// Parse from string (case-insensitive), falling back to cubic.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl std::fmt::Display for SplineOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Cubic => write!(f, "cubic"),
        }
    }
}

/// Length of an axis of `len` samples after zooming by `factor`.
///
/// Halves round to even, so `5 * 0.5` gives 2 and `7 * 0.5` gives 4.
pub fn zoomed_len(len: usize, factor: f64) -> usize {
    (len as f64 * factor).round_ties_even() as usize
}

/// Shape of a `(height, width)` grid after zooming by `factor`.
pub fn zoomed_shape(shape: (usize, usize), factor: f64) -> (usize, usize) {
    (zoomed_len(shape.0, factor), zoomed_len(shape.1, factor))
}

/// Zoom a 2-D grid by `factor` on both axes.
pub fn zoom_2d(input: ArrayView2<'_, f64>, factor: f64, order: SplineOrder) -> Array2<f64> {
    let (height, width) = input.dim();
    let (out_height, out_width) = zoomed_shape((height, width), factor);

    if out_height == 0 || out_width == 0 {
        return Array2::zeros((out_height, out_width));
    }

    let mut coeffs = input.to_owned();
    if order == SplineOrder::Cubic {
        for lane in coeffs.lanes_mut(Axis(1)) {
            cubic_prefilter(lane);
        }
        for lane in coeffs.lanes_mut(Axis(0)) {
            cubic_prefilter(lane);
        }
    }

    let row_taps = axis_taps(height, out_height, order);
    let col_taps = axis_taps(width, out_width, order);

    // Rows first, then columns.
    let mut partial = Array2::<f64>::zeros((out_height, width));
    for (oy, taps) in row_taps.iter().enumerate() {
        for &(iy, weight) in taps {
            let src = coeffs.row(iy);
            partial
                .row_mut(oy)
                .zip_mut_with(&src, |dst, &v| *dst += weight * v);
        }
    }

    let mut output = Array2::<f64>::zeros((out_height, out_width));
    for ((oy, ox), value) in output.indexed_iter_mut() {
        *value = col_taps[ox]
            .iter()
            .map(|&(ix, weight)| weight * partial[[oy, ix]])
            .sum();
    }

    output
}

/// Input samples and weights contributing to each output sample of one axis.
fn axis_taps(in_len: usize, out_len: usize, order: SplineOrder) -> Vec<Vec<(usize, f64)>> {
    let scale = if out_len > 1 {
        (in_len - 1) as f64 / (out_len - 1) as f64
    } else {
        1.0
    };

    (0..out_len)
        .map(|o| {
            let x = o as f64 * scale;
            let base = x.floor() as isize;
            match order {
                SplineOrder::Linear => {
                    let frac = x - base as f64;
                    vec![
                        (mirror_index(base, in_len), 1.0 - frac),
                        (mirror_index(base + 1, in_len), frac),
                    ]
                }
                SplineOrder::Cubic => (base - 1..=base + 2)
                    .map(|i| (mirror_index(i, in_len), cubic_bspline(x - i as f64)))
                    .collect(),
            }
        })
        .collect()
}

/// Reflect an out-of-range index about the first and last samples.
fn mirror_index(i: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = i.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

/// Centred cubic B-spline basis.
fn cubic_bspline(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        2.0 / 3.0 - x * x + x * x * x / 2.0
    } else if x < 2.0 {
        let t = 2.0 - x;
        t * t * t / 6.0
    } else {
        0.0
    }
}

/// Convert samples to cubic B-spline coefficients in place.
///
/// Recursive causal/anti-causal filter with pole `sqrt(3) - 2` and
/// mirror-symmetric boundary initialisation.
fn cubic_prefilter(mut line: ArrayViewMut1<'_, f64>) {
    let n = line.len();
    if n < 2 {
        return;
    }

    let z = 3f64.sqrt() - 2.0;
    let gain = (1.0 - z) * (1.0 - 1.0 / z);
    line.mapv_inplace(|v| v * gain);

    line[0] = causal_initial(&line, z);
    for k in 1..n {
        let prev = line[k - 1];
        line[k] += z * prev;
    }

    line[n - 1] = (z / (z * z - 1.0)) * (z * line[n - 2] + line[n - 1]);
    for k in (0..n - 1).rev() {
        let next = line[k + 1];
        line[k] = z * (next - line[k]);
    }
}

fn causal_initial(line: &ArrayViewMut1<'_, f64>, z: f64) -> f64 {
    let n = line.len();
    let iz = 1.0 / z;
    let mut zn = z;
    let mut z2n = z.powi(n as i32 - 1);
    let mut sum = line[0] + z2n * line[n - 1];
    z2n *= z2n * iz;
    for k in 1..n - 1 {
        sum += (zn + z2n) * line[k];
        zn *= z;
        z2n *= iz;
    }
    sum / (1.0 - zn * zn)
}
