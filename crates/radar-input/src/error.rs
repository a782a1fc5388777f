//! Error types for radar input preparation.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while resolving, reading or assembling a window.
#[derive(Error, Debug)]
pub enum RadarInputError {
    /// The file is missing, unreadable, or lacks the expected dataset.
    #[error("failed to access radar file {}: {message}", path.display())]
    FileAccess { path: PathBuf, message: String },

    /// A grid does not share the spatial shape of the first grid in the window.
    #[error("grid shape mismatch in {grid}: expected {expected:?}, found {found:?}")]
    Shape {
        grid: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// No paths were supplied.
    #[error("input window is empty")]
    EmptyWindow,

    /// Anchor timestamp could not be parsed.
    #[error("invalid time format: {0}")]
    InvalidTime(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RadarInputError {
    /// Create a FileAccess error.
    pub fn file_access(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::FileAccess {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for radar input operations.
pub type Result<T> = std::result::Result<T, RadarInputError>;
