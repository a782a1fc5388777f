//! Radar input preparation for precipitation nowcasting.
//!
//! Turns an anchor timestamp into the model input for the observation window
//! ending at it:
//!
//! ```text
//! anchor time
//!      │
//!      ▼
//! PathResolver::resolve_paths        N paths, oldest first
//!      │
//!      ▼
//! InputAssembler::load_and_assemble  read ─► mask ─► zero ─► zoom ─► stack ─► mm/h
//!      │
//!      ▼
//! AssembledInput { array: (N, H', W', 1), mask: (H', W') }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use radar_input::{parse_anchor, RadarInputConfig};
//!
//! let config = RadarInputConfig::from_env();
//! config.validate()?;
//!
//! let anchor = parse_anchor("2024-01-15T12:00:00Z")?;
//! let paths = config.resolver().resolve_paths(anchor);
//! let input = config.assembler().load_and_assemble(&paths)?;
//!
//! assert_eq!(input.timesteps(), config.input_steps);
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod odim;
pub mod paths;
pub mod time;
pub mod zoom;

// Re-export commonly used types at crate root
pub use assemble::{
    load_window, sentinel_mask, zero_sentinel, AssembledInput, InputAssembler,
    ACCUMULATIONS_PER_HOUR, RAW_VALUES_PER_MM, SENTINEL,
};
pub use config::{RadarInputConfig, DEFAULT_DATASET_PATH};
pub use error::{RadarInputError, Result};
pub use odim::{open_radar_file, silence_hdf5_errors};
pub use paths::PathResolver;
pub use time::{parse_anchor, timestep_window};
pub use zoom::{zoom_2d, zoomed_shape, SplineOrder};
