//! Domain model: events, weekly schedules and busy intervals.

use chrono::{DateTime, Duration, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SlotError};
use crate::time::{parse_timezone, time_to_comparable};

/// Day of the week an availability window recurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Monday-first order, as the schedule editor lists them.
    pub const IN_ORDER: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        DayOfWeek::IN_ORDER[day.num_days_from_monday() as usize]
    }
}

/// A bookable meeting type owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub duration_in_minutes: i64,
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl Event {
    /// Check the duration is positive.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidEvent`] when `duration_in_minutes <= 0`.
    pub fn validate_duration(&self) -> Result<()> {
        if self.duration_in_minutes <= 0 {
            return Err(SlotError::InvalidEvent(format!(
                "duration must be positive, got {} minutes",
                self.duration_in_minutes
            )));
        }
        Ok(())
    }

    /// Event length as a chrono duration.
    ///
    /// Lengths past chrono's range saturate at [`Duration::MAX`]; such an
    /// event cannot fit in any window, so it resolves to no slots.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidEvent`] when `duration_in_minutes <= 0`.
    pub fn duration(&self) -> Result<Duration> {
        self.validate_duration()?;
        Ok(Duration::try_minutes(self.duration_in_minutes).unwrap_or(Duration::MAX))
    }
}

/// One recurring weekly open interval, in the schedule's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub day_of_week: DayOfWeek,
    /// Wall-clock opening time, `"H:MM"` or `"HH:MM"`.
    pub start_time: String,
    /// Wall-clock closing time, `"H:MM"` or `"HH:MM"`.
    pub end_time: String,
}

impl Availability {
    pub fn new(day_of_week: DayOfWeek, start_time: &str, end_time: &str) -> Self {
        Self {
            day_of_week,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }
}

/// An owner's weekly availability, expressed in one IANA timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub owner_id: String,
    pub timezone: String,
    #[serde(default)]
    pub availabilities: Vec<Availability>,
}

impl Schedule {
    /// Parsed timezone of this schedule.
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    /// Group the availability entries by weekday.
    pub fn weekly(&self) -> WeeklyAvailability {
        WeeklyAvailability::from_availabilities(&self.availabilities)
    }
}

/// Owner-submitted schedule before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub timezone: String,
    #[serde(default)]
    pub availabilities: Vec<Availability>,
}

impl ScheduleInput {
    /// Validate the submission.
    ///
    /// The timezone must be a known IANA identifier, every time must parse,
    /// every window must open before it closes, and windows on the same day
    /// must not overlap (touching edges are fine).
    pub fn validate(&self) -> Result<()> {
        parse_timezone(&self.timezone)?;

        for day in DayOfWeek::IN_ORDER {
            let mut windows = Vec::new();
            for availability in self.availabilities.iter().filter(|a| a.day_of_week == day) {
                let start = time_to_comparable(&availability.start_time)?;
                let end = time_to_comparable(&availability.end_time)?;
                if start >= end {
                    return Err(SlotError::InvalidSchedule(format!(
                        "{:?} window {}-{} must start before it ends",
                        day, availability.start_time, availability.end_time
                    )));
                }
                windows.push((start, end, availability));
            }

            windows.sort_by_key(|&(start, end, _)| (start, end));
            for pair in windows.windows(2) {
                let (_, prev_end, prev) = pair[0];
                let (next_start, _, next) = pair[1];
                if next_start < prev_end {
                    return Err(SlotError::InvalidSchedule(format!(
                        "{:?} windows {}-{} and {}-{} overlap",
                        day, prev.start_time, prev.end_time, next.start_time, next.end_time
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn into_schedule(self, owner_id: &str) -> Schedule {
        Schedule {
            owner_id: owner_id.to_string(),
            timezone: self.timezone,
            availabilities: self.availabilities,
        }
    }
}

/// A window of one day, as minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DailyWindow {
    pub start_minute: u32,
    pub end_minute: u32,
}

/// Availability windows grouped by weekday and sorted by opening time.
///
/// Built once per loaded schedule. Entries with an unparseable time, or that
/// open at or after their closing time, contribute no window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    days: [Vec<DailyWindow>; 7],
}

impl WeeklyAvailability {
    pub fn from_availabilities(availabilities: &[Availability]) -> Self {
        let mut weekly = Self::default();
        for availability in availabilities {
            let (start_minute, end_minute) = match (
                time_to_comparable(&availability.start_time),
                time_to_comparable(&availability.end_time),
            ) {
                (Ok(start), Ok(end)) => (start, end),
                (Err(err), _) | (_, Err(err)) => {
                    warn!(
                        day = ?availability.day_of_week,
                        error = %err,
                        "skipping stored availability window"
                    );
                    continue;
                }
            };
            if start_minute >= end_minute {
                continue;
            }
            weekly.days[availability.day_of_week.index()].push(DailyWindow {
                start_minute,
                end_minute,
            });
        }
        for windows in &mut weekly.days {
            windows.sort();
        }
        weekly
    }

    pub fn windows(&self, day: DayOfWeek) -> &[DailyWindow] {
        &self.days[day.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

/// A half-open `[start, end)` range already committed on an external calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// A half-open range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
