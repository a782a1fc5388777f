//! Configuration for radar input preparation.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assemble::InputAssembler;
use crate::error::{RadarInputError, Result};
use crate::paths::PathResolver;
use crate::zoom::SplineOrder;

/// ODIM HDF5 location of the first quantity of the first dataset.
pub const DEFAULT_DATASET_PATH: &str = "dataset1/data1/data";

/// Longest allowed spacing between observations (one day).
pub const MAX_TIMESTEP_MINUTES: i64 = 24 * 60;

/// Longest allowed window span, oldest to newest observation (one year).
pub const MAX_WINDOW_SPAN_MINUTES: i64 = 366 * 24 * 60;

/// Configuration for resolving and loading an input window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarInputConfig {
    /// Directory holding the radar files.
    pub data_dir: PathBuf,

    /// Number of timesteps in one input window.
    pub input_steps: usize,

    /// Spacing between consecutive observations, in minutes.
    pub timestep_minutes: i64,

    /// strftime format turning an observation time into a file name.
    pub file_date_format: String,

    /// Path of the 2-D measurement dataset inside each file.
    pub dataset_path: String,

    /// Spatial rescale factor applied to both axes.
    pub zoom_factor: f64,

    /// Spline order used by the rescale.
    pub spline_order: SplineOrder,
}

impl Default for RadarInputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/radar"),
            input_steps: 4,
            timestep_minutes: 5,
            file_date_format: "%Y%m%d%H%M.h5".to_string(),
            dataset_path: DEFAULT_DATASET_PATH.to_string(),
            zoom_factor: 0.5,
            spline_order: SplineOrder::Cubic,
        }
    }
}

impl RadarInputConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RADAR_DATA_DIR") {
            config.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("RADAR_INPUT_STEPS") {
            if let Ok(steps) = val.parse() {
                config.input_steps = steps;
            }
        }

        if let Ok(val) = std::env::var("RADAR_TIMESTEP_MINUTES") {
            if let Ok(minutes) = val.parse() {
                config.timestep_minutes = minutes;
            }
        }

        if let Ok(val) = std::env::var("RADAR_FILE_DATE_FORMAT") {
            config.file_date_format = val;
        }

        if let Ok(val) = std::env::var("RADAR_DATASET_PATH") {
            config.dataset_path = val;
        }

        if let Ok(val) = std::env::var("RADAR_ZOOM_FACTOR") {
            if let Ok(factor) = val.parse() {
                config.zoom_factor = factor;
            }
        }

        if let Ok(val) = std::env::var("RADAR_SPLINE_ORDER") {
            config.spline_order = spline_order_from_env(&val);
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RadarInputError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| RadarInputError::config(format!("invalid YAML: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.input_steps == 0 {
            return Err(RadarInputError::config("input_steps must be > 0"));
        }

        if self.timestep_minutes <= 0 {
            return Err(RadarInputError::config("timestep_minutes must be > 0"));
        }

        if self.timestep_minutes > MAX_TIMESTEP_MINUTES {
            return Err(RadarInputError::config(format!(
                "timestep_minutes must be <= {}",
                MAX_TIMESTEP_MINUTES
            )));
        }

        let span = i64::try_from(self.input_steps - 1)
            .ok()
            .and_then(|intervals| intervals.checked_mul(self.timestep_minutes));
        if !matches!(span, Some(span) if span <= MAX_WINDOW_SPAN_MINUTES) {
            return Err(RadarInputError::config(format!(
                "input window spans more than {} minutes",
                MAX_WINDOW_SPAN_MINUTES
            )));
        }

        if !self.zoom_factor.is_finite() || self.zoom_factor <= 0.0 {
            return Err(RadarInputError::config("zoom_factor must be a positive number"));
        }

        if self.dataset_path.trim_matches('/').is_empty() {
            return Err(RadarInputError::config("dataset_path must not be empty"));
        }

        if self.file_date_format.is_empty() {
            return Err(RadarInputError::config("file_date_format must not be empty"));
        }

        // Formatting with a malformed strftime string panics, so reject it here.
        if StrftimeItems::new(&self.file_date_format).any(|item| matches!(item, Item::Error)) {
            return Err(RadarInputError::config(format!(
                "file_date_format is not a valid strftime format: {}",
                self.file_date_format
            )));
        }

        Ok(())
    }

    /// Step between consecutive observations.
    pub fn timestep(&self) -> Duration {
        Duration::minutes(self.timestep_minutes)
    }

    /// Build the path resolver described by this configuration.
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(
            self.data_dir.clone(),
            self.input_steps,
            self.timestep(),
            self.file_date_format.clone(),
        )
    }

    /// Build the grid assembler described by this configuration.
    pub fn assembler(&self) -> InputAssembler {
        InputAssembler::new(self.dataset_path.clone(), self.zoom_factor, self.spline_order)
    }
}

/// Unrecognised values fall back to the default order with a warning.
fn spline_order_from_env(val: &str) -> SplineOrder {
    SplineOrder::parse(val).unwrap_or_else(|| {
        let fallback = SplineOrder::default();
        warn!(
            value = %val,
            fallback = %fallback,
            "Unrecognised RADAR_SPLINE_ORDER, using default"
        );
        fallback
    })
}
