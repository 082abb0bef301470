//! Busy-interval timeline for fast per-candidate overlap checks.
//!
//! Sorts busy intervals by start time and merges overlapping or adjacent
//! ones, so a candidate range can be tested with one binary search instead
//! of a scan over every interval.

use chrono::{DateTime, Utc};

use crate::conflict;
use crate::model::BusyInterval;

/// Merge overlapping or adjacent busy intervals.
///
/// Returns a sorted list of disjoint intervals. Reversed intervals
/// (`end < start`) cover nothing and are discarded.
pub fn merge_busy_intervals(busy: &[BusyInterval]) -> Vec<BusyInterval> {
    let mut intervals: Vec<BusyInterval> = busy.iter().filter(|b| b.start <= b.end).copied().collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_by_key(|b| (b.start, b.end));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Merged busy intervals of one resolution request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyTimeline {
    merged: Vec<BusyInterval>,
}

impl BusyTimeline {
    pub fn new(busy: &[BusyInterval]) -> Self {
        Self {
            merged: merge_busy_intervals(busy),
        }
    }

    /// Whether `[start, end)` overlaps any busy interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let idx = self.merged.partition_point(|b| b.end <= start);
        self.merged
            .get(idx)
            .is_some_and(|b| conflict::overlaps(start, end, b))
    }

    pub fn intervals(&self) -> &[BusyInterval] {
        &self.merged
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn busy(sh: u32, sm: u32, eh: u32, em: u32) -> BusyInterval {
        BusyInterval::new(at(sh, sm), at(eh, em))
    }

    #[test]
    fn merges_overlapping_and_adjacent() {
        let merged = merge_busy_intervals(&[
            busy(13, 0, 14, 0),
            busy(9, 0, 10, 0),
            busy(9, 30, 10, 30),
            busy(10, 30, 11, 0),
        ]);
        assert_eq!(merged, vec![busy(9, 0, 11, 0), busy(13, 0, 14, 0)]);
    }

    #[test]
    fn drops_reversed_intervals() {
        assert!(merge_busy_intervals(&[busy(10, 0, 9, 0)]).is_empty());
    }

    #[test]
    fn timeline_lookup_respects_half_open_edges() {
        let timeline = BusyTimeline::new(&[busy(9, 0, 9, 30), busy(12, 0, 13, 0)]);
        assert!(timeline.overlaps(at(9, 0), at(9, 30)));
        assert!(!timeline.overlaps(at(9, 30), at(10, 0)));
        assert!(!timeline.overlaps(at(11, 30), at(12, 0)));
        assert!(timeline.overlaps(at(11, 30), at(12, 1)));
        assert!(!timeline.overlaps(at(13, 0), at(14, 0)));
    }
}
