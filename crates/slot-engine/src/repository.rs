//! Event and schedule storage boundary.
//!
//! The relational store is external; [`ScheduleRepository`] is the contract
//! the booking flow needs from it. Input validation happens here, at the
//! save boundary, so the resolver can assume well-formed schedules.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{RepositoryError, SlotError};
use crate::model::{Event, Schedule, ScheduleInput};

/// Who is asking for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The owner sees every event, active or not.
    Owner,
    /// Public visitors only see active events.
    Public,
}

impl Visibility {
    fn admits(self, event: &Event) -> bool {
        match self {
            Visibility::Owner => true,
            Visibility::Public => event.is_active,
        }
    }
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] if no visible event matches.
    async fn get_event(
        &self,
        owner_id: &str,
        event_id: &str,
        visibility: Visibility,
    ) -> Result<Event, RepositoryError>;

    /// The owner's visible events, ordered by case-insensitive name.
    async fn list_events(
        &self,
        owner_id: &str,
        visibility: Visibility,
    ) -> Result<Vec<Event>, RepositoryError>;

    /// Insert or replace an event (keyed by owner and id).
    async fn save_event(&self, event: Event) -> Result<Event, RepositoryError>;

    async fn delete_event(&self, owner_id: &str, event_id: &str) -> Result<(), RepositoryError>;

    async fn get_schedule(&self, owner_id: &str) -> Result<Option<Schedule>, RepositoryError>;

    /// Upsert the owner's schedule and replace its whole availability set
    /// in one atomic step.
    async fn save_schedule(
        &self,
        owner_id: &str,
        input: ScheduleInput,
    ) -> Result<Schedule, RepositoryError>;
}

/// Check an event before it is stored.
pub fn validate_event(event: &Event) -> Result<(), SlotError> {
    if event.name.trim().is_empty() {
        return Err(SlotError::InvalidEvent("name is required".to_string()));
    }
    event.validate_duration()
}

#[derive(Debug, Default)]
struct Store {
    events: HashMap<(String, String), Event>,
    schedules: HashMap<String, Schedule>,
}

/// Process-local repository; one lock guards events and schedules together.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryRepository {
    async fn get_event(
        &self,
        owner_id: &str,
        event_id: &str,
        visibility: Visibility,
    ) -> Result<Event, RepositoryError> {
        let store = self.store.read();
        store
            .events
            .get(&(owner_id.to_string(), event_id.to_string()))
            .filter(|event| visibility.admits(event))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("event {event_id} of {owner_id}")))
    }

    async fn list_events(
        &self,
        owner_id: &str,
        visibility: Visibility,
    ) -> Result<Vec<Event>, RepositoryError> {
        let store = self.store.read();
        let mut events: Vec<Event> = store
            .events
            .values()
            .filter(|event| event.owner_id == owner_id && visibility.admits(event))
            .cloned()
            .collect();
        events.sort_by_cached_key(|event| (event.name.to_lowercase(), event.id.clone()));
        Ok(events)
    }

    async fn save_event(&self, event: Event) -> Result<Event, RepositoryError> {
        validate_event(&event)?;
        let key = (event.owner_id.clone(), event.id.clone());
        self.store.write().events.insert(key, event.clone());
        Ok(event)
    }

    async fn delete_event(&self, owner_id: &str, event_id: &str) -> Result<(), RepositoryError> {
        self.store
            .write()
            .events
            .remove(&(owner_id.to_string(), event_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("event {event_id} of {owner_id}")))
    }

    async fn get_schedule(&self, owner_id: &str) -> Result<Option<Schedule>, RepositoryError> {
        Ok(self.store.read().schedules.get(owner_id).cloned())
    }

    async fn save_schedule(
        &self,
        owner_id: &str,
        input: ScheduleInput,
    ) -> Result<Schedule, RepositoryError> {
        input.validate()?;
        let schedule = input.into_schedule(owner_id);
        self.store
            .write()
            .schedules
            .insert(owner_id.to_string(), schedule.clone());
        Ok(schedule)
    }
}
