//! Per-attendee availability aggregation.
//!
//! Fetches every attendee's busy slots from a [`CalendarSource`] concurrently,
//! waits for all of them, then derives each attendee's free intervals. One
//! unknown or slow attendee is skipped with a diagnostic; an unreachable source
//! fails the whole batch.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use crate::error::{ResolveError, Result};
use crate::freebusy::derive_free;
use crate::interval::{AttendeeAvailability, BusySlot};
use crate::policy::BusinessCalendarPolicy;
use crate::source::CalendarSource;

/// Knobs for the fetch phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Per-attendee fetch timeout. An attendee whose fetch exceeds it is
    /// skipped. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

/// Why an attendee was left out of the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The calendar source does not know this attendee.
    UnknownAttendee,
    /// The fetch exceeded [`AggregateOptions::fetch_timeout`].
    TimedOut,
}

/// A diagnostic for an attendee that was excluded from the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAttendee {
    pub attendee_id: String,
    pub reason: SkipReason,
}

/// The outcome of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// One record per resolved attendee, in first-occurrence input order.
    pub availabilities: Vec<AttendeeAvailability>,
    /// Attendees that were excluded, in input order.
    pub skipped: Vec<SkippedAttendee>,
}

/// Fetch and derive availability for each attendee in `attendee_ids`.
///
/// Duplicate ids collapse to their first occurrence. Fetches are issued
/// concurrently and joined before any derivation starts.
///
/// # Errors
/// Returns `ResolveError::SourceUnavailable` (or any other non-attendee error
/// the source reports) if a single fetch fails that way; partial results are
/// discarded.
pub async fn aggregate<S, T>(
    source: &S,
    attendee_ids: &[T],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    policy: &BusinessCalendarPolicy,
    options: AggregateOptions,
) -> Result<Aggregation>
where
    S: CalendarSource + ?Sized,
    T: AsRef<str>,
{
    let ids = unique_in_order(attendee_ids);
    if ids.is_empty() {
        return Ok(Aggregation::default());
    }

    // Inverted ranges are still fetched, over an empty window.
    let (fetch_start, fetch_end) = policy
        .day_bounds(range_start, range_end)
        .unwrap_or_else(|| {
            tracing::debug!(%range_start, %range_end, "inverted date range");
            (range_start, range_start)
        });

    let fetches = ids
        .iter()
        .map(|id| fetch_one(source, id, fetch_start, fetch_end, options.fetch_timeout));
    let outcomes = join_all(fetches).await;

    let mut aggregation = Aggregation::default();
    for (id, outcome) in ids.into_iter().zip(outcomes) {
        match outcome {
            FetchOutcome::Fetched(mut busy_slots) => {
                busy_slots.sort_by_key(|slot| (slot.interval.start(), slot.interval.end()));
                let free_slots = derive_free(&busy_slots, range_start, range_end, policy);
                tracing::debug!(
                    attendee_id = id,
                    busy = busy_slots.len(),
                    free = free_slots.len(),
                    "derived availability"
                );
                aggregation.availabilities.push(AttendeeAvailability {
                    attendee_id: id.to_string(),
                    free_slots,
                    busy_slots,
                });
            }
            FetchOutcome::Skipped(reason) => {
                tracing::warn!(attendee_id = id, ?reason, "skipping attendee");
                aggregation.skipped.push(SkippedAttendee {
                    attendee_id: id.to_string(),
                    reason,
                });
            }
            FetchOutcome::Failed(err) => {
                tracing::error!(attendee_id = id, error = %err, "calendar fetch failed");
                return Err(err);
            }
        }
    }

    Ok(aggregation)
}

enum FetchOutcome {
    Fetched(Vec<BusySlot>),
    Skipped(SkipReason),
    Failed(ResolveError),
}

async fn fetch_one<S>(
    source: &S,
    attendee_id: &str,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    timeout: Option<Duration>,
) -> FetchOutcome
where
    S: CalendarSource + ?Sized,
{
    let fetch = source.fetch_busy_slots(attendee_id, range_start, range_end);
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, fetch).await {
            Ok(result) => result,
            Err(_) => return FetchOutcome::Skipped(SkipReason::TimedOut),
        },
        None => fetch.await,
    };

    match result {
        Ok(busy) => FetchOutcome::Fetched(busy),
        Err(ResolveError::UnknownAttendee(_)) => FetchOutcome::Skipped(SkipReason::UnknownAttendee),
        Err(err) => FetchOutcome::Failed(err),
    }
}

fn unique_in_order<T: AsRef<str>>(attendee_ids: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    attendee_ids
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .collect()
}
