//! Wall-clock to instant resolution across DST transitions.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Which side of an availability window a local time describes.
///
/// Decides how an ambiguous wall-clock time (the repeated hour when clocks
/// fall back) maps to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdge {
    /// Opening edge: takes the earlier of two candidate instants.
    Start,
    /// Closing edge: takes the later of two candidate instants.
    End,
}

/// Resolve `minute_of_day` on the local `date` in `tz` to a UTC instant.
///
/// Ambiguous times resolve per [`WindowEdge`]. Times inside a spring-forward
/// gap are read with the offset in force before the transition, so 02:30 on
/// the New York spring-forward day becomes 03:30 EDT.
pub fn resolve_local(tz: Tz, date: NaiveDate, minute_of_day: u32, edge: WindowEdge) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute_of_day));

    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, latest) => match edge {
            WindowEdge::Start => earliest.with_timezone(&Utc),
            WindowEdge::End => latest.with_timezone(&Utc),
        },
        LocalResult::None => {
            // Transitions are at least a day apart, so the offset a day
            // earlier is the one in force before the gap.
            let before = tz
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix()
                .local_minus_utc();
            Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(before))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plain_local_time() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let got = resolve_local(tz, date(2026, 1, 5), 9 * 60, WindowEdge::Start);
        assert_eq!(got, Utc.with_ymd_and_hms(2026, 1, 5, 14, 0, 0).unwrap());
    }

    #[test]
    fn gap_time_shifts_forward() {
        // 2026-03-08 02:30 does not exist in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        let got = resolve_local(tz, date(2026, 3, 8), 2 * 60 + 30, WindowEdge::Start);
        assert_eq!(got, Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap());
    }

    #[test]
    fn ambiguous_time_depends_on_edge() {
        // 2026-11-01 01:30 happens twice in New York (EDT then EST).
        let tz: Tz = "America/New_York".parse().unwrap();
        let start = resolve_local(tz, date(2026, 11, 1), 90, WindowEdge::Start);
        let end = resolve_local(tz, date(2026, 11, 1), 90, WindowEdge::End);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 11, 1, 6, 30, 0).unwrap());
    }
}
