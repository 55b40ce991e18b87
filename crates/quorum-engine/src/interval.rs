//! Time intervals and the slot types built on them.
//!
//! Every interval is half-open (`[start, end)`) and non-empty. The only way to
//! obtain a [`TimeInterval`] is through [`TimeInterval::new`] (or serde, which
//! routes through it), so a malformed interval from a calendar source is
//! rejected at ingestion rather than flowing into the sweep.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// A non-empty, half-open time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = ResolveError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting `start >= end` with
    /// [`ResolveError::InvalidInterval`].
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(ResolveError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Half-open containment: `start <= t < end`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Adjacent intervals (one ends exactly when the other starts) do not.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlapping part of `self` and `other`, if any.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TimeInterval { start, end })
    }
}

/// A period an attendee is already committed to, as reported by the
/// calendar source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusySlot {
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// Meeting title (may be empty).
    #[serde(default)]
    pub label: String,
}

impl BusySlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, label: impl Into<String>) -> Result<Self> {
        Ok(Self {
            interval: TimeInterval::new(start, end)?,
            label: label.into(),
        })
    }
}

/// One attendee's derived availability for a single resolution call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeAvailability {
    pub attendee_id: String,
    /// Chronological, non-overlapping free intervals within business hours.
    pub free_slots: Vec<TimeInterval>,
    /// Busy slots as fetched, sorted by `(start, end)`.
    pub busy_slots: Vec<BusySlot>,
}

/// A window in which at least one attendee is free for the whole requested
/// duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `available_attendees.len() / attendee count`, in `[0, 1]`. Not rounded.
    pub confidence: f64,
    /// Attendee ids free for the whole window, in the order the attendees
    /// were queried.
    pub available_attendees: Vec<String>,
}

impl CandidateSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Strict overlap; see [`TimeInterval::overlaps`].
    pub fn overlaps(&self, other: &CandidateSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}
