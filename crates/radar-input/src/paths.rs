//! Resolution of radar file paths for an input window.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::time::timestep_window;

/// Maps an anchor timestamp to the files of its trailing observation window.
///
/// Performs no I/O; returned paths need not exist.
#[derive(Debug, Clone)]
pub struct PathResolver {
    data_dir: PathBuf,
    input_steps: usize,
    timestep: Duration,
    date_format: String,
}

impl PathResolver {
    /// `date_format` must be a valid strftime format; see
    /// [`RadarInputConfig::validate`](crate::RadarInputConfig::validate).
    pub fn new(
        data_dir: impl Into<PathBuf>,
        input_steps: usize,
        timestep: Duration,
        date_format: impl Into<String>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            input_steps,
            timestep,
            date_format: date_format.into(),
        }
    }

    /// Number of paths produced per window.
    pub fn input_steps(&self) -> usize {
        self.input_steps
    }

    /// File name for a single observation time.
    pub fn file_name(&self, time: DateTime<Utc>) -> String {
        time.format(&self.date_format).to_string()
    }

    /// Paths for the window ending at `anchor`, oldest first.
    pub fn resolve_paths(&self, anchor: DateTime<Utc>) -> Vec<PathBuf> {
        let paths: Vec<PathBuf> = timestep_window(anchor, self.input_steps, self.timestep)
            .into_iter()
            .map(|time| self.data_dir.join(self.file_name(time)))
            .collect();

        debug!(
            anchor = %anchor,
            steps = self.input_steps,
            first = ?paths.first(),
            "Resolved radar input window"
        );

        paths
    }
}
