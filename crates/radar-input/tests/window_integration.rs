//! Integration tests reading real HDF5 radar files written into temp dirs.

use chrono::{Duration, TimeZone, Utc};
use ndarray::Array2;
use radar_input::{
    load_window, silence_hdf5_errors, InputAssembler, RadarInputConfig, RadarInputError,
    SplineOrder, DEFAULT_DATASET_PATH,
};
use test_utils::{
    assert_approx_eq, assert_arrays_approx_eq, indexed_grid, radar_disc_grid, scale_covered,
    uniform_grid, with_gaps, write_cube_file, write_dataset, write_radar_file, write_window,
    NO_COVERAGE,
};

fn identity_assembler() -> InputAssembler {
    InputAssembler::new(DEFAULT_DATASET_PATH, 1.0, SplineOrder::Cubic)
}

fn half_assembler() -> InputAssembler {
    InputAssembler::new(DEFAULT_DATASET_PATH, 0.5, SplineOrder::Cubic)
}

// =============================================================================
// Reference window
// =============================================================================

#[test]
fn test_reference_window_identity_zoom() {
    let grids = vec![
        with_gaps(&uniform_grid(4, 4, 500), &[(0, 0)]),
        uniform_grid(4, 4, 200),
        uniform_grid(4, 4, 200),
    ];
    let fixture = write_window(&grids).expect("Failed to write window");

    let input = identity_assembler()
        .load_and_assemble(&fixture.paths)
        .expect("Failed to assemble");

    assert_eq!(input.array.dim(), (3, 4, 4, 1));
    assert_eq!(input.mask.dim(), (4, 4));

    assert_approx_eq!(input.mask[[0, 0]], 1.0, 1e-5);
    assert_approx_eq!(input.array[[0, 0, 0, 0]], 0.0, 1e-3);

    for r in 0..4 {
        for c in 0..4 {
            if (r, c) != (0, 0) {
                assert_approx_eq!(input.mask[[r, c]], 0.0, 1e-5);
                assert_approx_eq!(input.array[[0, r, c, 0]], 60.0, 1e-3);
            }
            assert_approx_eq!(input.array[[1, r, c, 0]], 24.0, 1e-3);
            assert_approx_eq!(input.array[[2, r, c, 0]], 24.0, 1e-3);
        }
    }
}

#[test]
fn test_half_resolution_shapes() {
    let grids = vec![radar_disc_grid(16, 12, 5.0, 300); 4];
    let fixture = write_window(&grids).unwrap();

    let input = half_assembler().load_and_assemble(&fixture.paths).unwrap();

    assert_eq!(input.array.dim(), (4, 8, 6, 1));
    assert_eq!(input.mask.dim(), (8, 6));
    assert_eq!(input.timesteps(), 4);
    assert_eq!(input.spatial_shape(), (8, 6));

    // Corners lie outside the disc and map onto input corners.
    assert_approx_eq!(input.mask[[0, 0]], 1.0, 1e-6);
    assert_approx_eq!(input.mask[[7, 5]], 1.0, 1e-6);
}

#[test]
fn test_sentinel_never_reaches_output() {
    let grids = vec![radar_disc_grid(10, 10, 3.0, 1000); 2];
    let fixture = write_window(&grids).unwrap();

    let input = half_assembler().load_and_assemble(&fixture.paths).unwrap();

    // 65535 / 100 * 12 would be ~7864 mm/h; zeroed cells keep values near the data range.
    let max = input.array.iter().cloned().fold(f32::MIN, f32::max);
    assert!(max < 200.0, "sentinel leaked into output: max = {}", max);
}

// =============================================================================
// Mask semantics
// =============================================================================

#[test]
fn test_mask_depends_only_on_first_file() {
    let first = with_gaps(&indexed_grid(8, 8), &[(0, 0), (0, 1), (1, 0)]);

    let window_a = write_window(&[first.clone(), indexed_grid(8, 8), indexed_grid(8, 8)]).unwrap();
    let window_b = write_window(&[
        first,
        uniform_grid(8, 8, NO_COVERAGE),
        with_gaps(&uniform_grid(8, 8, 40), &[(5, 5), (6, 6)]),
    ])
    .unwrap();

    let a = half_assembler().load_and_assemble(&window_a.paths).unwrap();
    let b = half_assembler().load_and_assemble(&window_b.paths).unwrap();

    assert_eq!(a.mask, b.mask);
    assert_ne!(a.array, b.array);
}

#[test]
fn test_fully_uncovered_later_grid_becomes_zero() {
    let grids = vec![uniform_grid(4, 4, 100), uniform_grid(4, 4, NO_COVERAGE)];
    let fixture = write_window(&grids).unwrap();

    let input = identity_assembler().load_and_assemble(&fixture.paths).unwrap();

    assert!(input.mask.iter().all(|&m| m.abs() < 1e-6));
    assert!(input.array.index_axis(ndarray::Axis(0), 1).iter().all(|&v| v.abs() < 1e-3));
}

// =============================================================================
// Linearity of the conversion
// =============================================================================

#[test]
fn test_output_scales_linearly_with_input() {
    let base = with_gaps(&indexed_grid(10, 10), &[(9, 9), (0, 4)]);
    let tripled = scale_covered(&base, 3);

    let base_fixture = write_window(&[base.clone(), base]).unwrap();
    let tripled_fixture = write_window(&[tripled.clone(), tripled]).unwrap();

    let a = half_assembler().load_and_assemble(&base_fixture.paths).unwrap();
    let b = half_assembler().load_and_assemble(&tripled_fixture.paths).unwrap();

    assert_arrays_approx_eq!(b.array, a.array.mapv(|v| v * 3.0), 1e-2);
    assert_arrays_approx_eq!(a.mask, b.mask, 1e-9);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_shape_mismatch_fails() {
    let grids = vec![uniform_grid(4, 4, 1), uniform_grid(4, 4, 1), uniform_grid(4, 6, 1)];
    let fixture = write_window(&grids).unwrap();

    match identity_assembler().load_and_assemble(&fixture.paths) {
        Err(RadarInputError::Shape { grid, expected, found }) => {
            assert!(grid.ends_with("frame_2.h5"), "unexpected grid: {}", grid);
            assert_eq!(expected, (4, 4));
            assert_eq!(found, (4, 6));
        }
        other => panic!("expected Shape error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_fails() {
    silence_hdf5_errors();
    let fixture = write_window(&[uniform_grid(4, 4, 1)]).unwrap();
    let mut paths = fixture.paths.clone();
    paths.push(fixture.dir.path().join("missing.h5"));

    match identity_assembler().load_and_assemble(&paths) {
        Err(RadarInputError::FileAccess { path, .. }) => assert!(path.ends_with("missing.h5")),
        other => panic!("expected FileAccess error, got {:?}", other),
    }
}

#[test]
fn test_wrong_dataset_path_fails() {
    silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.h5");
    write_dataset(&path, "dataset1/data2/data", &uniform_grid(4, 4, 1)).unwrap();

    let err = identity_assembler().load_and_assemble(&[&path]).unwrap_err();
    assert!(matches!(err, RadarInputError::FileAccess { .. }));
}

#[test]
fn test_three_dimensional_dataset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.h5");
    write_cube_file(&path, 2, 4, 4).unwrap();

    match identity_assembler().load_and_assemble(&[&path]) {
        Err(RadarInputError::FileAccess { message, .. }) => {
            assert!(message.contains("3 dimensions"), "{}", message)
        }
        other => panic!("expected FileAccess error, got {:?}", other),
    }
}

#[test]
fn test_empty_path_list_fails() {
    let paths: Vec<std::path::PathBuf> = Vec::new();
    let err = identity_assembler().load_and_assemble(&paths).unwrap_err();
    assert!(matches!(err, RadarInputError::EmptyWindow));
}

// =============================================================================
// Resolver + loader
// =============================================================================

#[test]
fn test_load_window_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = RadarInputConfig {
        data_dir: dir.path().to_path_buf(),
        input_steps: 3,
        timestep_minutes: 5,
        zoom_factor: 1.0,
        ..Default::default()
    };
    config.validate().unwrap();

    let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    for (k, value) in [(2i64, 100u16), (1, 200), (0, 300)] {
        let time = anchor - Duration::minutes(5 * k);
        let path = dir.path().join(time.format("%Y%m%d%H%M.h5").to_string());
        write_radar_file(&path, &uniform_grid(6, 6, value)).unwrap();
    }

    let input = load_window(&config, anchor).unwrap();

    assert_eq!(input.array.dim(), (3, 6, 6, 1));
    // Oldest first: 100, 200, 300 raw -> 12, 24, 36 mm/h.
    assert_approx_eq!(input.array[[0, 3, 3, 0]], 12.0, 1e-3);
    assert_approx_eq!(input.array[[1, 3, 3, 0]], 24.0, 1e-3);
    assert_approx_eq!(input.array[[2, 3, 3, 0]], 36.0, 1e-3);
}

#[test]
fn test_load_window_missing_observation() {
    silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let config = RadarInputConfig {
        data_dir: dir.path().to_path_buf(),
        input_steps: 2,
        ..Default::default()
    };

    let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    write_radar_file(&dir.path().join("202401151200.h5"), &uniform_grid(4, 4, 1)).unwrap();

    match load_window(&config, anchor) {
        Err(RadarInputError::FileAccess { path, .. }) => {
            assert!(path.ends_with("202401151155.h5"))
        }
        other => panic!("expected FileAccess error, got {:?}", other),
    }
}

#[test]
fn test_linear_order_matches_cubic_on_flat_fields() {
    let grids = vec![uniform_grid(6, 6, 250); 2];
    let fixture = write_window(&grids).unwrap();

    let cubic = half_assembler().load_and_assemble(&fixture.paths).unwrap();
    let linear = InputAssembler::new(DEFAULT_DATASET_PATH, 0.5, SplineOrder::Linear)
        .load_and_assemble(&fixture.paths)
        .unwrap();

    assert_arrays_approx_eq!(cubic.array, linear.array, 1e-3);
    assert_eq!(linear.mask, Array2::<f32>::zeros((3, 3)));
}
