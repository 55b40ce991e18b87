//! End-to-end meeting time resolution: aggregate → sweep → rank.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{aggregate, AggregateOptions, SkippedAttendee};
use crate::error::{ResolveError, Result};
use crate::interval::CandidateSlot;
use crate::policy::BusinessCalendarPolicy;
use crate::rank::{rank, DEFAULT_MAX_RESULTS};
use crate::source::CalendarSource;
use crate::sweep::{find_common_with_resolution, DEFAULT_RESOLUTION_MINUTES};

/// Options for [`resolve_meeting_times_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    pub policy: BusinessCalendarPolicy,
    /// Upper bound on returned slots.
    pub max_results: usize,
    /// Per-attendee fetch timeout; see [`AggregateOptions::fetch_timeout`].
    pub fetch_timeout: Option<Duration>,
    /// Sweep grid step in minutes.
    pub resolution_minutes: i64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            policy: BusinessCalendarPolicy::default(),
            max_results: DEFAULT_MAX_RESULTS,
            fetch_timeout: None,
            resolution_minutes: DEFAULT_RESOLUTION_MINUTES,
        }
    }
}

/// Ranked slots plus the attendees that had to be left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub slots: Vec<CandidateSlot>,
    pub skipped: Vec<SkippedAttendee>,
}

/// Find up to five non-overlapping meeting windows of `duration_minutes`
/// within the business days of `[range_start, range_end]`, ranked by the
/// fraction of attendees free.
///
/// `policy` defaults to Monday–Friday, 09:00–18:00 UTC.
///
/// An empty result means no slot was found; it is never used to signal a
/// source failure.
///
/// # Errors
/// - `ResolveError::InvalidDuration` if `duration_minutes <= 0`.
/// - `ResolveError::InvalidPolicy` if the policy has no valid window.
/// - `ResolveError::SourceUnavailable` if the calendar source cannot be reached.
pub async fn resolve_meeting_times<S, T>(
    source: &S,
    attendee_ids: &[T],
    duration_minutes: i64,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    policy: Option<&BusinessCalendarPolicy>,
) -> Result<Vec<CandidateSlot>>
where
    S: CalendarSource + ?Sized,
    T: AsRef<str>,
{
    let options = ResolveOptions {
        policy: policy.cloned().unwrap_or_default(),
        ..ResolveOptions::default()
    };
    let resolution = resolve_meeting_times_with(
        source,
        attendee_ids,
        duration_minutes,
        range_start,
        range_end,
        &options,
    )
    .await?;
    Ok(resolution.slots)
}

/// Like [`resolve_meeting_times`], with every knob exposed and the skipped
/// attendees reported alongside the slots.
///
/// # Errors
/// As [`resolve_meeting_times`].
pub async fn resolve_meeting_times_with<S, T>(
    source: &S,
    attendee_ids: &[T],
    duration_minutes: i64,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    options: &ResolveOptions,
) -> Result<Resolution>
where
    S: CalendarSource + ?Sized,
    T: AsRef<str>,
{
    if duration_minutes <= 0 {
        return Err(ResolveError::InvalidDuration(format!(
            "meeting duration must be positive, got {duration_minutes} minutes"
        )));
    }
    if options.resolution_minutes <= 0 {
        return Err(ResolveError::InvalidDuration(format!(
            "sweep resolution must be positive, got {} minutes",
            options.resolution_minutes
        )));
    }
    options.policy.validate()?;

    if attendee_ids.is_empty() {
        return Ok(Resolution::default());
    }

    tracing::info!(
        attendees = attendee_ids.len(),
        duration_minutes,
        %range_start,
        %range_end,
        "resolving meeting times"
    );

    let aggregation = aggregate(
        source,
        attendee_ids,
        range_start,
        range_end,
        &options.policy,
        AggregateOptions {
            fetch_timeout: options.fetch_timeout,
        },
    )
    .await?;

    let candidates = find_common_with_resolution(
        &aggregation.availabilities,
        duration_minutes,
        options.resolution_minutes,
    );
    tracing::debug!(candidates = candidates.len(), "sweep complete");

    let slots = rank(candidates, options.max_results);
    if slots.is_empty() {
        tracing::info!("no common slot found");
    }

    Ok(Resolution {
        slots,
        skipped: aggregation.skipped,
    })
}
