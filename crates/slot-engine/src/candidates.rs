//! Candidate start times for the public booking page.

use chrono::{DateTime, Days, Duration, Months, Utc};
use chrono_tz::Tz;

use crate::config::EngineConfig;
use crate::dst::{resolve_local, WindowEdge};
use crate::error::{Result, SlotError};
use crate::model::TimeRange;

/// Round `now` up to the next multiple of `step_minutes` (unchanged if it
/// already is one).
pub fn round_up_to_step(now: DateTime<Utc>, step_minutes: u32) -> DateTime<Utc> {
    let step_seconds = i64::from(step_minutes.max(1)) * 60;
    let remainder = now.timestamp().rem_euclid(step_seconds);
    let truncated = now - Duration::seconds(remainder) - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos()));
    if truncated == now {
        now
    } else {
        truncated + Duration::seconds(step_seconds)
    }
}

/// The range of start times offered from `now`.
///
/// Starts at `now` rounded up to the slot step and ends at the close of the
/// local day (in `tz`) that lies `horizon_months` after the start. The end is
/// exclusive: the next local midnight.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDatetime`] if the horizon leaves chrono's
/// representable range.
pub fn booking_window(now: DateTime<Utc>, config: &EngineConfig, tz: Tz) -> Result<TimeRange> {
    let start = round_up_to_step(now, config.slot_step_minutes);

    let last_day = start
        .with_timezone(&tz)
        .date_naive()
        .checked_add_months(Months::new(config.horizon_months))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .ok_or_else(|| SlotError::InvalidDatetime(format!("{start} + {} months", config.horizon_months)))?;

    Ok(TimeRange {
        start,
        end: resolve_local(tz, last_day, 0, WindowEdge::Start),
    })
}

/// Every `step_minutes` from `range.start` while before `range.end`.
pub fn candidate_instants(range: TimeRange, step_minutes: u32) -> Vec<DateTime<Utc>> {
    if step_minutes == 0 || range.start >= range.end {
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(step_minutes));
    let capacity = ((range.end - range.start).num_minutes() / i64::from(step_minutes) + 1) as usize;

    let mut candidates = Vec::with_capacity(capacity);
    let mut cursor = range.start;
    while cursor < range.end {
        candidates.push(cursor);
        cursor += step;
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rounds_up_partial_steps() {
        let now = Utc.with_ymd_and_hms(2026, 3, 16, 9, 1, 0).unwrap();
        assert_eq!(
            round_up_to_step(now, 15),
            Utc.with_ymd_and_hms(2026, 3, 16, 9, 15, 0).unwrap()
        );
    }

    #[test]
    fn exact_step_is_kept() {
        let now = Utc.with_ymd_and_hms(2026, 3, 16, 9, 30, 0).unwrap();
        assert_eq!(round_up_to_step(now, 15), now);
    }

    #[test]
    fn sub_second_remainder_rounds_up() {
        let now = Utc.with_ymd_and_hms(2026, 3, 16, 9, 30, 0).unwrap() + Duration::milliseconds(1);
        assert_eq!(
            round_up_to_step(now, 15),
            Utc.with_ymd_and_hms(2026, 3, 16, 9, 45, 0).unwrap()
        );
    }
}
