//! Tests for overlap detection between a proposed booking and busy time.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::conflict::overlaps;
use slot_engine::model::BusyInterval;
use slot_engine::find_conflicts;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn busy(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyInterval {
    BusyInterval::new(at(start_hour, start_min), at(end_hour, end_min))
}

#[test]
fn partial_overlap_is_measured() {
    // Booking 09:00-10:00, busy 09:30-10:30 → 30-min overlap
    let conflicts = find_conflicts(at(9, 0), at(10, 0), &[busy(9, 30, 10, 30)]);

    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn adjacent_ranges_do_not_conflict() {
    // Booking 09:00-10:00, busy 10:00-11:00 → touching, NOT overlapping
    assert!(find_conflicts(at(9, 0), at(10, 0), &[busy(10, 0, 11, 0)]).is_empty());
    // Booking 10:00-11:00, busy 09:00-10:00 → touching the other way
    assert!(find_conflicts(at(10, 0), at(11, 0), &[busy(9, 0, 10, 0)]).is_empty());
}

#[test]
fn shared_start_is_a_conflict() {
    assert!(overlaps(at(9, 0), at(9, 30), &busy(9, 0, 9, 15)));
}

#[test]
fn containment_in_either_direction_conflicts() {
    let conflicts = find_conflicts(
        at(9, 0),
        at(12, 0),
        &[busy(10, 0, 10, 45), busy(8, 0, 13, 0)],
    );
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].overlap_minutes, 45);
    assert_eq!(conflicts[1].overlap_minutes, 180);
}

#[test]
fn disjoint_ranges_do_not_conflict() {
    assert!(find_conflicts(at(9, 0), at(10, 0), &[busy(11, 0, 12, 0), busy(7, 0, 8, 0)]).is_empty());
}

#[test]
fn empty_busy_list_has_no_conflicts() {
    assert!(find_conflicts(at(9, 0), at(10, 0), &[]).is_empty());
}
