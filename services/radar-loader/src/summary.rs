//! JSON summary of an assembled input window.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use radar_input::AssembledInput;
use serde::Serialize;

/// What the loader prints after assembling a window.
#[derive(Debug, Clone, Serialize)]
pub struct WindowSummary {
    pub anchor: DateTime<Utc>,
    pub paths: Vec<PathBuf>,
    /// `[time, height, width, channel]`
    pub array_shape: Vec<usize>,
    /// `[height, width]`
    pub mask_shape: Vec<usize>,
    /// Mean of the rescaled mask: share of the grid outside coverage.
    pub masked_fraction: f64,
    pub rate_mm_h: RateStats,
}

/// Rain rate statistics over the whole array.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RateStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
}

impl WindowSummary {
    pub fn new(anchor: DateTime<Utc>, paths: Vec<PathBuf>, input: &AssembledInput) -> Self {
        let masked_fraction = if input.mask.is_empty() {
            0.0
        } else {
            input.mask.iter().map(|&m| m as f64).sum::<f64>() / input.mask.len() as f64
        };

        Self {
            anchor,
            paths,
            array_shape: input.array.shape().to_vec(),
            mask_shape: input.mask.shape().to_vec(),
            masked_fraction,
            rate_mm_h: RateStats::from_values(input.array.iter().copied()),
        }
    }
}

impl RateStats {
    fn from_values(values: impl Iterator<Item = f32>) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            count += 1;
        }

        if count == 0 {
            return Self { min: 0.0, max: 0.0, mean: 0.0 };
        }

        Self {
            min,
            max,
            mean: sum / count as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::{Array2, Array4};

    fn sample_input() -> AssembledInput {
        let mut array = Array4::<f32>::zeros((2, 2, 2, 1));
        array[[1, 0, 0, 0]] = 12.0;
        array[[1, 1, 1, 0]] = 4.0;
        let mut mask = Array2::<f32>::zeros((2, 2));
        mask[[0, 0]] = 1.0;
        AssembledInput { array, mask }
    }

    #[test]
    fn test_summary_fields() {
        let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let summary = WindowSummary::new(anchor, vec![PathBuf::from("a.h5")], &sample_input());

        assert_eq!(summary.array_shape, vec![2, 2, 2, 1]);
        assert_eq!(summary.mask_shape, vec![2, 2]);
        assert!((summary.masked_fraction - 0.25).abs() < 1e-12);
        assert_eq!(summary.rate_mm_h.min, 0.0);
        assert_eq!(summary.rate_mm_h.max, 12.0);
        assert!((summary.rate_mm_h.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_serializes() {
        let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let summary = WindowSummary::new(anchor, vec![], &sample_input());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["anchor"], "2024-01-15T12:00:00Z");
        assert_eq!(json["array_shape"], serde_json::json!([2, 2, 2, 1]));
        assert_eq!(json["rate_mm_h"]["max"], 12.0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = RateStats::from_values(std::iter::empty());
        assert_eq!(stats, RateStats { min: 0.0, max: 0.0, mean: 0.0 });
    }
}
