//! The calendar source the engine reads busy slots from.
//!
//! The engine never talks to a calendar provider directly; callers plug one in
//! through [`CalendarSource`]. [`InMemoryCalendarSource`] serves fixed data and
//! backs the CLI and the tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};
use crate::interval::{BusySlot, TimeInterval};

/// A provider of per-attendee busy slots.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch the busy slots of `attendee_id` that overlap
    /// `[range_start, range_end)`.
    ///
    /// # Errors
    /// `ResolveError::UnknownAttendee` if the id cannot be resolved,
    /// `ResolveError::SourceUnavailable` if the provider cannot be reached.
    async fn fetch_busy_slots(
        &self,
        attendee_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusySlot>>;
}

/// A calendar source backed by a fixed map of attendee id to busy slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCalendarSource {
    attendees: BTreeMap<String, Vec<BusySlot>>,
    #[serde(skip)]
    unreachable: bool,
}

impl InMemoryCalendarSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `attendee_id` with the given busy slots, replacing any
    /// previous registration.
    pub fn with_attendee(mut self, attendee_id: impl Into<String>, busy: Vec<BusySlot>) -> Self {
        self.attendees.insert(attendee_id.into(), busy);
        self
    }

    /// Make every fetch fail with `SourceUnavailable`.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Parse a source from JSON of the form
    /// `{"attendees": {"<id>": [{"start": .., "end": .., "label": ..}]}}`.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn attendee_ids(&self) -> impl Iterator<Item = &str> {
        self.attendees.keys().map(String::as_str)
    }
}

#[async_trait]
impl CalendarSource for InMemoryCalendarSource {
    async fn fetch_busy_slots(
        &self,
        attendee_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusySlot>> {
        if self.unreachable {
            return Err(ResolveError::SourceUnavailable(
                "in-memory source marked unreachable".to_string(),
            ));
        }

        let busy = self
            .attendees
            .get(attendee_id)
            .ok_or_else(|| ResolveError::UnknownAttendee(attendee_id.to_string()))?;

        // An inverted or empty query range matches nothing.
        let Ok(range) = TimeInterval::new(range_start, range_end) else {
            return Ok(Vec::new());
        };

        Ok(busy
            .iter()
            .filter(|slot| slot.interval.overlaps(&range))
            .cloned()
            .collect())
    }
}
