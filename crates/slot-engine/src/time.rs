//! Time-of-day parsing and timezone labelling.
//!
//! Every function takes its timezone and reference instant as explicit
//! arguments. Nothing in this module reads the system clock or the host's
//! local zone, so results are reproducible in tests and inside WASM.

use chrono::{DateTime, Offset, Utc};
use chrono_tz::{Tz, TZ_VARIANTS};
use serde::Serialize;

use crate::error::{Result, SlotError};

/// Minutes in one day; every comparable time-of-day is strictly below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ── time_to_comparable ──────────────────────────────────────────────────────

/// Parse a wall-clock time-of-day into minutes since midnight.
///
/// Accepts `H`, `H:MM` and `HH:MM`. Hours must be in `0..=23` and minutes in
/// `0..=59`. The result is only meaningful for comparisons within a single
/// day.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimeFormat`] when the string does not match
/// the pattern or a component is out of range.
///
/// # Examples
///
/// ```
/// use slot_engine::time::time_to_comparable;
///
/// assert_eq!(time_to_comparable("9:00").unwrap(), 540);
/// assert_eq!(time_to_comparable("17:30").unwrap(), 1050);
/// assert!(time_to_comparable("24:00").is_err());
/// ```
pub fn time_to_comparable(time_of_day: &str) -> Result<u32> {
    let invalid = || SlotError::InvalidTimeFormat(time_of_day.to_string());

    let (hour_part, minute_part) = match time_of_day.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (time_of_day, None),
    };

    let hour = parse_digits(hour_part, 1..=2).ok_or_else(invalid)?;
    let minute = match minute_part {
        Some(m) => parse_digits(m, 2..=2).ok_or_else(invalid)?,
        None => 0,
    };

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }

    Ok(hour * 60 + minute)
}

/// Parse an all-ASCII-digit string whose length lies in `len`.
fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ── timezones ───────────────────────────────────────────────────────────────

/// Parse an IANA timezone identifier.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] for unknown identifiers.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Human-readable UTC offset of `timezone` at the instant `at`.
///
/// Produces `"GMT"` for a zero offset, whole hours as `"GMT-5"`, and
/// fractional offsets as `"GMT+5:30"`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] for unknown identifiers.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use slot_engine::time::timezone_offset_label;
///
/// let winter = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
/// assert_eq!(timezone_offset_label("America/New_York", winter).unwrap(), "GMT-5");
/// assert_eq!(timezone_offset_label("Asia/Kolkata", winter).unwrap(), "GMT+5:30");
/// ```
pub fn timezone_offset_label(timezone: &str, at: DateTime<Utc>) -> Result<String> {
    let tz = parse_timezone(timezone)?;
    Ok(offset_label(tz, at))
}

fn offset_label(tz: Tz, at: DateTime<Utc>) -> String {
    let seconds = at.with_timezone(&tz).offset().fix().local_minus_utc();
    format_offset_seconds(seconds)
}

fn format_offset_seconds(seconds: i32) -> String {
    if seconds == 0 {
        return "GMT".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let total_minutes = seconds.unsigned_abs() / 60;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if minutes == 0 {
        format!("GMT{sign}{hours}")
    } else {
        format!("GMT{sign}{hours}:{minutes:02}")
    }
}

/// One entry of the timezone picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimezoneOption {
    /// IANA identifier, e.g. `"Europe/Berlin"`.
    pub name: String,
    /// Offset label at the reference instant, e.g. `"GMT+1"`.
    pub offset_label: String,
}

/// Every IANA timezone known to `chrono-tz`, labelled with its offset at `at`.
pub fn supported_timezones(at: DateTime<Utc>) -> Vec<TimezoneOption> {
    TZ_VARIANTS
        .iter()
        .map(|tz| TimezoneOption {
            name: tz.name().to_string(),
            offset_label: offset_label(*tz, at),
        })
        .collect()
}

// ── durations ───────────────────────────────────────────────────────────────

/// Describe an event length the way the booking pages show it.
///
/// `"30 mins"`, `"1 min"`, `"1 hr"`, `"2 hrs"`, `"1 hr 30 mins"`. Zero reads `"0 mins"`.
pub fn describe_duration(duration_in_minutes: u32) -> String {
    let hours = duration_in_minutes / 60;
    let minutes = duration_in_minutes % 60;

    let hours_text = format!("{} {}", hours, if hours > 1 { "hrs" } else { "hr" });
    let minutes_text = format!("{} {}", minutes, if minutes == 1 { "min" } else { "mins" });

    match (hours, minutes) {
        (0, _) => minutes_text,
        (_, 0) => hours_text,
        _ => format!("{hours_text} {minutes_text}"),
    }
}
