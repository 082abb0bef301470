//! Busy-interval provider boundary.
//!
//! The external calendar (OAuth, event listing) lives behind
//! [`BusyIntervalProvider`]. This module also turns the raw entries such a
//! calendar returns into [`BusyInterval`]s, and ships an in-memory provider
//! used by the CLI and tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::conflict;
use crate::dst::{resolve_local, WindowEdge};
use crate::error::ProviderError;
use crate::model::{BusyInterval, TimeRange};

/// Source of an owner's committed calendar time.
///
/// Callers query once per resolution request with the whole range they are
/// about to evaluate.
#[async_trait]
pub trait BusyIntervalProvider: Send + Sync {
    async fn list_busy_intervals(
        &self,
        owner_id: &str,
        range: TimeRange,
    ) -> Result<Vec<BusyInterval>, ProviderError>;
}

/// One event as an external calendar reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarEntry {
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Whole-day event; `end_date` is exclusive.
    AllDay {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

/// Convert calendar entries to busy intervals.
///
/// All-day entries block from local midnight of `start_date` to local
/// midnight of `end_date` in `tz`. Entries that end at or before they start
/// are dropped.
pub fn normalize_entries(entries: &[CalendarEntry], tz: Tz) -> Vec<BusyInterval> {
    entries
        .iter()
        .map(|entry| match *entry {
            CalendarEntry::Timed { start, end } => BusyInterval::new(start, end),
            CalendarEntry::AllDay { start_date, end_date } => BusyInterval::new(
                resolve_local(tz, start_date, 0, WindowEdge::Start),
                resolve_local(tz, end_date, 0, WindowEdge::Start),
            ),
        })
        .filter(|busy| busy.start < busy.end)
        .collect()
}

/// Provider serving a fixed list of intervals, or a fixed failure.
#[derive(Debug, Default)]
pub struct StaticBusyProvider {
    intervals: Vec<BusyInterval>,
    failure: Option<ProviderError>,
    calls: AtomicUsize,
}

impl StaticBusyProvider {
    pub fn new(intervals: Vec<BusyInterval>) -> Self {
        Self {
            intervals,
            ..Self::default()
        }
    }

    /// A provider whose every call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of `list_busy_intervals` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusyIntervalProvider for StaticBusyProvider {
    async fn list_busy_intervals(
        &self,
        _owner_id: &str,
        range: TimeRange,
    ) -> Result<Vec<BusyInterval>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self
            .intervals
            .iter()
            .filter(|busy| conflict::overlaps(range.start, range.end, busy))
            .copied()
            .collect())
    }
}
