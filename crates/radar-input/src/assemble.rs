//! Loading and assembling an input window into a model input array.
//!
//! Pipeline order for one window:
//!
//! ```text
//! paths ─► read grids ─► shape check
//!                          │
//!                          ├─► mask from first grid (1 where sentinel)
//!                          │
//!                          └─► zero sentinel cells in every grid
//!                                   │
//!                                   ▼
//!                        zoom grids and mask by the same factor
//!                                   │
//!                                   ▼
//!                 stack on time axis ─► /100 *12 ─► trailing channel axis
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::{Array2, Array3, Array4, Axis};
use tracing::{debug, info};

use crate::config::RadarInputConfig;
use crate::error::{RadarInputError, Result};
use crate::odim::open_radar_file;
use crate::zoom::{zoom_2d, SplineOrder};

/// Raw value marking cells outside radar coverage.
pub const SENTINEL: f64 = 65535.0;

/// Raw values are hundredths of a millimetre.
pub const RAW_VALUES_PER_MM: f64 = 100.0;

/// Five-minute accumulations per hour.
pub const ACCUMULATIONS_PER_HOUR: f64 = 12.0;

/// Model input assembled from one observation window.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledInput {
    /// Rain rate in mm/h, shape `(time, height, width, 1)`, oldest first.
    pub array: Array4<f32>,
    /// Coverage mask of the oldest grid after rescaling, shape `(height, width)`.
    ///
    /// 1 marks no coverage. Interpolation leaves fractional values at the
    /// coverage boundary; they are not re-thresholded.
    pub mask: Array2<f32>,
}

impl AssembledInput {
    /// Length of the time axis.
    pub fn timesteps(&self) -> usize {
        self.array.len_of(Axis(0))
    }

    /// Rescaled `(height, width)`.
    pub fn spatial_shape(&self) -> (usize, usize) {
        self.mask.dim()
    }

    pub fn into_parts(self) -> (Array4<f32>, Array2<f32>) {
        (self.array, self.mask)
    }
}

/// 1.0 where `grid` holds the sentinel, 0.0 elsewhere.
pub fn sentinel_mask(grid: &Array2<f64>) -> Array2<f64> {
    grid.mapv(|v| if v == SENTINEL { 1.0 } else { 0.0 })
}

/// Copy of `grid` with sentinel cells set to 0.
pub fn zero_sentinel(grid: &Array2<f64>) -> Array2<f64> {
    grid.mapv(|v| if v == SENTINEL { 0.0 } else { v })
}

/// Reads grid files and assembles them into an [`AssembledInput`].
#[derive(Debug, Clone)]
pub struct InputAssembler {
    dataset_path: String,
    zoom_factor: f64,
    spline_order: SplineOrder,
}

impl InputAssembler {
    pub fn new(dataset_path: impl Into<String>, zoom_factor: f64, spline_order: SplineOrder) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            zoom_factor,
            spline_order,
        }
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Read every file in `paths`, in order, and assemble them.
    ///
    /// Fails without partial output if any file cannot be read or if the
    /// grids do not all share the first grid's shape.
    pub fn load_and_assemble<P: AsRef<Path>>(&self, paths: &[P]) -> Result<AssembledInput> {
        let mut grids = Vec::with_capacity(paths.len());
        let mut expected = None;

        for path in paths {
            let path = path.as_ref();
            let grid = open_radar_file(path, &self.dataset_path)?;
            let found = grid.dim();

            match expected {
                None => expected = Some(found),
                Some(expected) if expected != found => {
                    return Err(RadarInputError::Shape {
                        grid: path.display().to_string(),
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }

            grids.push(grid);
        }

        self.assemble(grids)
    }

    /// Mask, zero, rescale, stack and convert grids already in memory.
    pub fn assemble(&self, grids: Vec<Array2<f64>>) -> Result<AssembledInput> {
        let first = grids.first().ok_or(RadarInputError::EmptyWindow)?;
        let expected = first.dim();

        if let Some((index, grid)) = grids.iter().enumerate().find(|(_, g)| g.dim() != expected) {
            return Err(RadarInputError::Shape {
                grid: format!("grid {}", index),
                expected,
                found: grid.dim(),
            });
        }

        let mask = sentinel_mask(first);

        let zoomed: Vec<Array2<f64>> = grids
            .iter()
            .map(|grid| {
                let mut zoomed =
                    zoom_2d(zero_sentinel(grid).view(), self.zoom_factor, self.spline_order);
                // Spline overshoot must not produce negative accumulations.
                zoomed.mapv_inplace(|v| v.max(0.0));
                zoomed
            })
            .collect();
        let mask = zoom_2d(mask.view(), self.zoom_factor, self.spline_order);

        let (height, width) = mask.dim();
        let mut stacked = Array3::<f64>::zeros((zoomed.len(), height, width));
        for (mut slot, grid) in stacked.outer_iter_mut().zip(&zoomed) {
            slot.assign(grid);
        }

        let array = stacked
            .mapv(|v| (v / RAW_VALUES_PER_MM * ACCUMULATIONS_PER_HOUR) as f32)
            .insert_axis(Axis(3));
        let mask = mask.mapv(|v| v as f32);

        info!(
            timesteps = array.len_of(Axis(0)),
            height = mask.nrows(),
            width = mask.ncols(),
            zoom_factor = self.zoom_factor,
            spline_order = %self.spline_order,
            "Assembled radar input window"
        );

        Ok(AssembledInput { array, mask })
    }
}

/// Resolve and load the window ending at `anchor`.
pub fn load_window(config: &RadarInputConfig, anchor: DateTime<Utc>) -> Result<AssembledInput> {
    let paths = config.resolver().resolve_paths(anchor);
    debug!(count = paths.len(), "Loading radar input window");
    config.assembler().load_and_assemble(&paths)
}
