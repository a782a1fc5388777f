//! Reading radar grids from ODIM-style HDF5 files.
//!
//! Each file carries a single 2-D measurement dataset (by default at
//! `dataset1/data1/data`). Values are read as `f64`; the no-coverage sentinel
//! survives the conversion exactly.

use std::path::Path;
use std::sync::Once;

use ndarray::Array2;
use tracing::debug;

use crate::error::{RadarInputError, Result};

/// Silence HDF5's automatic error printing to stderr.
///
/// libhdf5 prints its whole error stack when an operation fails, even when
/// the failure is returned to and handled by the caller (for example a
/// missing dataset). Call early in `main()`; safe to call more than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 with null handlers disables automatic error
        // printing, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read the 2-D grid at `dataset_path` from the HDF5 file at `path`.
///
/// The file handle is released before this returns, on success or error.
pub fn open_radar_file(path: &Path, dataset_path: &str) -> Result<Array2<f64>> {
    let file = hdf5::File::open(path)
        .map_err(|e| RadarInputError::file_access(path, format!("cannot open: {}", e)))?;

    let dataset = file.dataset(dataset_path).map_err(|e| {
        RadarInputError::file_access(path, format!("missing dataset '{}': {}", dataset_path, e))
    })?;

    let shape = dataset.shape();
    let (height, width) = match shape.as_slice() {
        &[h, w] => (h, w),
        other => {
            return Err(RadarInputError::file_access(
                path,
                format!(
                    "dataset '{}' has {} dimensions, expected 2",
                    dataset_path,
                    other.len()
                ),
            ))
        }
    };

    let raw: Vec<f64> = dataset.read_raw().map_err(|e| {
        RadarInputError::file_access(path, format!("failed to read '{}': {}", dataset_path, e))
    })?;

    let grid = Array2::from_shape_vec((height, width), raw).map_err(|e| {
        RadarInputError::file_access(path, format!("dataset '{}': {}", dataset_path, e))
    })?;

    debug!(path = %path.display(), height, width, "Read radar grid");

    Ok(grid)
}
