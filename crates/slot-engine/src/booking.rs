//! Booking-page orchestration around the resolver.
//!
//! [`BookingService`] is the caller the resolver expects: it loads the event
//! and schedule from the repository, fetches busy intervals from the
//! provider exactly once for the whole range under evaluation, applies the
//! configured [`FailurePolicy`] when the provider fails, and resolves.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::candidates::{booking_window, candidate_instants};
use crate::config::{EngineConfig, FailurePolicy};
use crate::error::BookingError;
use crate::freebusy::BusyTimeline;
use crate::model::{Event, Schedule, TimeRange};
use crate::provider::BusyIntervalProvider;
use crate::repository::{ScheduleRepository, Visibility};
use crate::resolver::{self, PreparedSchedule};

/// Bookable start times for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSlots {
    pub event: Event,
    pub times: Vec<DateTime<Utc>>,
    /// `false` when the owner has never saved a schedule, which also yields
    /// no times; lets the page tell "not set up" apart from "fully booked".
    pub schedule_configured: bool,
}

pub struct BookingService<R, P> {
    repository: R,
    provider: P,
    config: EngineConfig,
}

impl<R, P> BookingService<R, P>
where
    R: ScheduleRepository,
    P: BusyIntervalProvider,
{
    pub fn new(repository: R, provider: P, config: EngineConfig) -> Self {
        Self {
            repository,
            provider,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Slots the public booking page offers from `now` through the
    /// configured horizon.
    pub async fn valid_times(
        &self,
        owner_id: &str,
        event_id: &str,
        now: DateTime<Utc>,
    ) -> Result<BookingSlots, BookingError> {
        let event = self
            .repository
            .get_event(owner_id, event_id, Visibility::Public)
            .await?;
        let Some(schedule) = self.repository.get_schedule(owner_id).await? else {
            return Ok(unconfigured(event));
        };

        let window = booking_window(now, &self.config, schedule.tz()?)?;
        let candidates = candidate_instants(window, self.config.slot_step_minutes);
        self.resolve(event, &schedule, &candidates, window).await
    }

    /// Filter caller-supplied candidates for `event_id`.
    pub async fn valid_times_for(
        &self,
        owner_id: &str,
        event_id: &str,
        candidates: &[DateTime<Utc>],
    ) -> Result<BookingSlots, BookingError> {
        let event = self
            .repository
            .get_event(owner_id, event_id, Visibility::Public)
            .await?;
        let duration = event.duration()?;
        let Some(schedule) = self.repository.get_schedule(owner_id).await? else {
            return Ok(unconfigured(event));
        };

        let (Some(first), Some(last)) = (candidates.iter().min(), candidates.iter().max()) else {
            return Ok(BookingSlots {
                event,
                times: Vec::new(),
                schedule_configured: true,
            });
        };
        let range = TimeRange {
            start: *first,
            end: last.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.resolve(event, &schedule, candidates, range).await
    }

    /// Re-check a single start time, e.g. right before confirming a booking.
    pub async fn is_bookable(
        &self,
        owner_id: &str,
        event_id: &str,
        start: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        let slots = self.valid_times_for(owner_id, event_id, &[start]).await?;
        Ok(!slots.times.is_empty())
    }

    async fn resolve(
        &self,
        event: Event,
        schedule: &Schedule,
        candidates: &[DateTime<Utc>],
        range: TimeRange,
    ) -> Result<BookingSlots, BookingError> {
        let duration = event.duration()?;
        let prepared = PreparedSchedule::new(schedule)?;

        let timeline = match self
            .provider
            .list_busy_intervals(&schedule.owner_id, range)
            .await
        {
            Ok(busy) => {
                debug!(owner = %schedule.owner_id, busy = busy.len(), "fetched busy intervals");
                BusyTimeline::new(&busy)
            }
            Err(err) => {
                warn!(
                    owner = %schedule.owner_id,
                    error = %err,
                    policy = ?self.config.failure_policy,
                    "busy-interval provider failed"
                );
                match self.config.failure_policy {
                    FailurePolicy::FailSafe => {
                        return Ok(BookingSlots {
                            event,
                            times: Vec::new(),
                            schedule_configured: true,
                        })
                    }
                    FailurePolicy::FailOpen => BusyTimeline::default(),
                }
            }
        };

        let times = resolver::resolve_with(
            candidates,
            duration,
            &prepared,
            &timeline,
            self.config.parallel_threshold,
        );
        debug!(
            event = %event.id,
            candidates = candidates.len(),
            valid = times.len(),
            "resolved booking slots"
        );

        Ok(BookingSlots {
            event,
            times,
            schedule_configured: true,
        })
    }
}

fn unconfigured(event: Event) -> BookingSlots {
    debug!(owner = %event.owner_id, "owner has no schedule");
    BookingSlots {
        event,
        times: Vec::new(),
        schedule_configured: false,
    }
}
