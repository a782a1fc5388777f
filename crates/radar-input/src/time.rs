//! Time handling for radar observation windows.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::error::{RadarInputError, Result};

/// Parse an anchor timestamp.
///
/// Supports:
/// - RFC 3339: "2024-01-15T12:05:00Z"
/// - Without timezone (UTC assumed): "2024-01-15T12:05:00" or "2024-01-15T12:05"
/// - Compact radar file stamp: "202401151205"
pub fn parse_anchor(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y%m%d%H%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(RadarInputError::InvalidTime(s.to_string()))
}

/// Build the trailing window of `steps` timestamps ending at `anchor`.
///
/// Ordered oldest first; the last element is `anchor` itself. Timestamps
/// that fall outside chrono's representable range are left out, so callers
/// needing exactly `steps` entries should bound the window span first (see
/// [`RadarInputConfig::validate`](crate::RadarInputConfig::validate)).
pub fn timestep_window(anchor: DateTime<Utc>, steps: usize, step: Duration) -> Vec<DateTime<Utc>> {
    (0..steps)
        .rev()
        .filter_map(|k| {
            let k = i32::try_from(k).ok()?;
            anchor.checked_sub_signed(step.checked_mul(k)?)
        })
        .collect()
}
