//! Derive an attendee's free intervals from their busy slots.
//!
//! For every business day in the requested date range the day's business
//! window is walked left to right against the busy slots that touch it. Time
//! outside business hours, and non-business days, never appear in the output.

use chrono::{DateTime, Utc};

use crate::interval::{BusySlot, TimeInterval};
use crate::policy::BusinessCalendarPolicy;

/// Compute free intervals for every business day in `[range_start, range_end]`.
///
/// The range is interpreted as whole calendar days in the policy timezone,
/// both ends inclusive. Busy slots may overlap, straddle the open or close
/// time, or lie entirely outside business hours; they are clipped to each
/// day's window before the walk.
///
/// Returns intervals sorted by start time, non-overlapping, each contained in
/// a single day's business window. An inverted range or a fully booked
/// calendar yields an empty list.
pub fn derive_free(
    busy_slots: &[BusySlot],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    policy: &BusinessCalendarPolicy,
) -> Vec<TimeInterval> {
    if range_start > range_end {
        return Vec::new();
    }

    let first_day = policy.local_date(range_start);
    let last_day = policy.local_date(range_end);

    first_day
        .iter_days()
        .take_while(|day| *day <= last_day)
        .filter_map(|day| policy.business_window(day))
        .flat_map(|window| free_within(busy_slots, window))
        .collect()
}

/// Free intervals of a single business window.
fn free_within(busy_slots: &[BusySlot], window: TimeInterval) -> Vec<TimeInterval> {
    let mut day_busy: Vec<TimeInterval> = busy_slots
        .iter()
        .filter_map(|slot| slot.interval.intersection(&window))
        .collect();

    // Sort by start time, then by end time so equal starts are deterministic.
    day_busy.sort_by_key(|busy| (busy.start(), busy.end()));

    let mut free = Vec::new();
    let mut cursor = window.start();

    for busy in &day_busy {
        if cursor < busy.start() {
            if let Ok(gap) = TimeInterval::new(cursor, busy.start()) {
                free.push(gap);
            }
        }
        cursor = cursor.max(busy.end());
    }

    // Trailing free interval after the last busy slot.
    if cursor < window.end() {
        if let Ok(tail) = TimeInterval::new(cursor, window.end()) {
            free.push(tail);
        }
    }

    free
}
