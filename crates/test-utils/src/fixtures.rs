//! HDF5 radar file fixtures.
//!
//! Files mimic the ODIM layout the loader expects: a single `u16` grid at
//! `dataset1/data1/data`.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use tempfile::TempDir;

/// Dataset path used by radar files.
pub const RADAR_DATASET: &str = "dataset1/data1/data";

/// Write `grid` as a radar file at `path`, creating parent directories.
pub fn write_radar_file(path: &Path, grid: &Array2<u16>) -> hdf5::Result<()> {
    write_dataset(path, RADAR_DATASET, grid)
}

/// Write `grid` at an arbitrary dataset path (for malformed-file tests).
pub fn write_dataset(path: &Path, dataset: &str, grid: &Array2<u16>) -> hdf5::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| hdf5::Error::from(format!("create {}: {}", parent.display(), e)))?;
    }

    let file = hdf5::File::create(path)?;
    let (group_path, name) = match dataset.rsplit_once('/') {
        Some((group, name)) => (Some(group), name),
        None => (None, dataset),
    };

    let mut group = file.as_group()?;
    if let Some(group_path) = group_path {
        for part in group_path.split('/').filter(|p| !p.is_empty()) {
            group = group.create_group(part)?;
        }
    }

    let (height, width) = grid.dim();
    let data: Vec<u16> = grid.iter().copied().collect();
    group
        .new_dataset::<u16>()
        .shape([height, width])
        .create(name)?
        .write_raw(data.as_slice())?;

    Ok(())
}

/// Write a 3-D dataset at the radar dataset path.
pub fn write_cube_file(path: &Path, depth: usize, height: usize, width: usize) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;
    let group = file.create_group("dataset1")?.create_group("data1")?;
    let data = vec![0u16; depth * height * width];
    group
        .new_dataset::<u16>()
        .shape([depth, height, width])
        .create("data")?
        .write_raw(data.as_slice())?;
    Ok(())
}

/// Temporary directory holding one radar file per grid.
pub struct RadarWindowFixture {
    pub dir: TempDir,
    pub paths: Vec<PathBuf>,
}

/// Write each grid to `<tempdir>/frame_<i>.h5`, in order.
pub fn write_window(grids: &[Array2<u16>]) -> hdf5::Result<RadarWindowFixture> {
    let dir = tempfile::tempdir()
        .map_err(|e| hdf5::Error::from(format!("tempdir: {}", e)))?;
    let mut paths = Vec::with_capacity(grids.len());

    for (i, grid) in grids.iter().enumerate() {
        let path = dir.path().join(format!("frame_{}.h5", i));
        write_radar_file(&path, grid)?;
        paths.push(path);
    }

    Ok(RadarWindowFixture { dir, paths })
}
