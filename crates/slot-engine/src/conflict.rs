//! Overlap checks between a proposed booking and busy intervals.
//!
//! Ranges are half-open. A booking that ends exactly when a busy interval
//! starts (or starts exactly when one ends) is NOT a conflict.

use chrono::{DateTime, Utc};

use crate::model::BusyInterval;

/// A busy interval that collides with a proposed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub busy: BusyInterval,
    pub overlap_minutes: i64,
}

/// Whether `[start, end)` intersects `busy` with positive length.
///
/// The test is `start < busy.end && end > busy.start`.
pub fn overlaps(start: DateTime<Utc>, end: DateTime<Utc>, busy: &BusyInterval) -> bool {
    start < busy.end && end > busy.start
}

/// Every busy interval overlapping `[start, end)`, with the overlap length.
pub fn find_conflicts(start: DateTime<Utc>, end: DateTime<Utc>, busy: &[BusyInterval]) -> Vec<Conflict> {
    busy.iter()
        .filter(|b| overlaps(start, end, b))
        .map(|b| {
            let overlap_start = start.max(b.start);
            let overlap_end = end.min(b.end);
            Conflict {
                busy: *b,
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            }
        })
        .collect()
}
