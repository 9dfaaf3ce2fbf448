//! Timestamp conversion utilities for TiCDC events
//!
//! TiCDC stamps rows and DDL with TiDB TSOs: the upper bits are a physical
//! Unix time in milliseconds, the lowest 18 bits a logical counter.

use chrono::DateTime;

const TSO_LOGICAL_BITS: u32 = 18;

/// Physical part of a TSO, in milliseconds since the Unix epoch
pub fn tso_physical_millis(ts: u64) -> i64 {
    (ts >> TSO_LOGICAL_BITS) as i64
}

/// Render the physical part of a TSO as a UTC date string
///
/// # Returns
/// A `String` in "YYYY-MM-DD HH:MM:SS.sss UTC" format, or the raw number when
/// it falls outside the range chrono can represent
pub fn format_tso(ts: u64) -> String {
    match DateTime::from_timestamp_millis(tso_physical_millis(ts)) {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => ts.to_string(),
    }
}
