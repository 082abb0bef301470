//! # slot-engine
//!
//! Timezone-correct booking availability.
//!
//! Owners describe when they can be booked as a weekly schedule of
//! wall-clock windows in one IANA timezone. Given that schedule, an event
//! length, candidate start instants and the busy intervals of the owner's
//! external calendar, the engine returns the candidates a visitor may book.
//! DST transitions and day-of-week shifts between UTC and the owner's zone
//! are handled via `chrono-tz`.
//!
//! ## Modules
//!
//! - [`time`]: time-of-day parsing, timezone offset labels, duration text
//! - [`dst`]: wall-clock → instant resolution across DST gaps and overlaps
//! - [`model`]: events, schedules, availability windows, busy intervals
//! - [`conflict`]: half-open overlap checks for one proposed booking
//! - [`freebusy`]: merged busy timeline with binary-search lookup
//! - [`resolver`]: filter candidates down to bookable start times
//! - [`candidates`]: the booking page's candidate start times
//! - [`provider`]: busy-interval provider boundary and entry normalization
//! - [`repository`]: event/schedule storage boundary
//! - [`booking`]: orchestration: load, fetch busy once, apply failure policy, resolve
//! - [`config`]: TOML engine configuration
//! - [`error`]: error types

pub mod booking;
pub mod candidates;
pub mod config;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod freebusy;
pub mod model;
pub mod provider;
pub mod repository;
pub mod resolver;
pub mod time;

pub use booking::{BookingService, BookingSlots};
pub use config::{EngineConfig, FailurePolicy};
pub use conflict::{find_conflicts, Conflict};
pub use error::{BookingError, ConfigError, ProviderError, RepositoryError, SlotError};
pub use model::{Availability, BusyInterval, DayOfWeek, Event, Schedule, ScheduleInput, TimeRange};
pub use provider::{BusyIntervalProvider, CalendarEntry, StaticBusyProvider};
pub use repository::{InMemoryRepository, ScheduleRepository, Visibility};
pub use resolver::resolve_valid_times;
pub use time::{describe_duration, time_to_comparable, timezone_offset_label};
