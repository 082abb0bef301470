//! Bookable start-time resolution.
//!
//! Filters caller-supplied candidate instants down to those where an event
//! of the requested length fits entirely inside one of the owner's weekly
//! availability windows and touches no busy interval.
//!
//! Windows are evaluated on the owner's local calendar day: the candidate is
//! projected into the schedule's timezone, and that local date and weekday
//! pick the windows to test. Window edges are turned into instants through
//! [`crate::dst::resolve_local`], so DST transitions move the UTC position of
//! a window without moving its wall-clock position.
//!
//! Each candidate is decided independently. Output keeps input order and
//! does not deduplicate.

use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_tz::Tz;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dst::{resolve_local, WindowEdge};
use crate::error::Result;
use crate::freebusy::BusyTimeline;
use crate::model::{BusyInterval, DayOfWeek, Event, Schedule, WeeklyAvailability};

/// Candidate count from which evaluation moves onto the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// A schedule with its timezone parsed and windows grouped per weekday.
#[derive(Debug, Clone)]
pub struct PreparedSchedule {
    tz: Tz,
    weekly: WeeklyAvailability,
}

impl PreparedSchedule {
    /// # Errors
    ///
    /// Returns [`crate::SlotError::InvalidTimezone`] when the stored zone is
    /// unknown. Malformed availability rows are skipped, not reported.
    pub fn new(schedule: &Schedule) -> Result<Self> {
        Ok(Self {
            tz: schedule.tz()?,
            weekly: schedule.weekly(),
        })
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Whether `[start, end)` lies inside one window of `start`'s local day.
    pub fn is_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let local = start.with_timezone(&self.tz);
        let date = local.date_naive();
        let day = DayOfWeek::from(local.weekday());

        self.weekly.windows(day).iter().any(|window| {
            let window_start = resolve_local(self.tz, date, window.start_minute, WindowEdge::Start);
            let window_end = resolve_local(self.tz, date, window.end_minute, WindowEdge::End);
            start >= window_start && end <= window_end
        })
    }
}

/// Return the candidates that are valid start times for `event`.
///
/// `schedule` is `None` when the owner never configured working hours; the
/// result is then empty. An empty `busy` list means the owner is entirely
/// free outside the schedule constraint.
///
/// # Errors
///
/// - [`crate::SlotError::InvalidEvent`] when `event.duration_in_minutes <= 0`.
/// - [`crate::SlotError::InvalidTimezone`] when the schedule's zone is unknown.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use slot_engine::model::{Availability, DayOfWeek, Event, Schedule};
/// use slot_engine::resolve_valid_times;
///
/// let schedule = Schedule {
///     owner_id: "owner".into(),
///     timezone: "UTC".into(),
///     availabilities: vec![Availability::new(DayOfWeek::Monday, "9:00", "17:00")],
/// };
/// let event = Event {
///     id: "intro".into(),
///     owner_id: "owner".into(),
///     name: "Intro call".into(),
///     duration_in_minutes: 30,
///     is_active: true,
///     description: None,
/// };
/// // 2026-03-16 is a Monday.
/// let nine = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();
/// let eight = Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap();
///
/// let valid = resolve_valid_times(&[eight, nine], &event, Some(&schedule), &[]).unwrap();
/// assert_eq!(valid, vec![nine]);
/// ```
pub fn resolve_valid_times(
    candidates: &[DateTime<Utc>],
    event: &Event,
    schedule: Option<&Schedule>,
    busy: &[BusyInterval],
) -> Result<Vec<DateTime<Utc>>> {
    let duration = event.duration()?;

    let Some(schedule) = schedule else {
        return Ok(Vec::new());
    };
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let prepared = PreparedSchedule::new(schedule)?;
    let timeline = BusyTimeline::new(busy);

    Ok(resolve_with(
        candidates,
        duration,
        &prepared,
        &timeline,
        DEFAULT_PARALLEL_THRESHOLD,
    ))
}

/// Resolve against an already-prepared schedule and busy timeline.
///
/// `duration` must be positive; [`resolve_valid_times`] checks this before
/// delegating here. Candidate sets of at least `parallel_threshold` entries
/// are evaluated in parallel when the `parallel` feature is enabled.
pub fn resolve_with(
    candidates: &[DateTime<Utc>],
    duration: Duration,
    schedule: &PreparedSchedule,
    busy: &BusyTimeline,
    parallel_threshold: usize,
) -> Vec<DateTime<Utc>> {
    let accept = |start: &DateTime<Utc>| is_bookable(*start, duration, schedule, busy);

    #[cfg(feature = "parallel")]
    {
        if candidates.len() >= parallel_threshold {
            return candidates.par_iter().copied().filter(accept).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel_threshold;

    candidates.iter().copied().filter(accept).collect()
}

/// Decide a single candidate.
pub fn is_bookable(
    start: DateTime<Utc>,
    duration: Duration,
    schedule: &PreparedSchedule,
    busy: &BusyTimeline,
) -> bool {
    let Some(end) = start.checked_add_signed(duration) else {
        return false;
    };
    schedule.is_within(start, end) && !busy.overlaps(start, end)
}
