//! Find windows where a quorum of attendees is simultaneously free.
//!
//! Free time is sampled on a fixed grid anchored at the earliest free start.
//! Each grid point with at least one free attendee is tried as a meeting
//! start: the set of attendees free at that point is intersected with the set
//! free at every later grid point before the meeting would end. A non-empty
//! result is a candidate whose confidence is the fraction of attendees left.

use chrono::{DateTime, Duration, Utc};

use crate::interval::{AttendeeAvailability, CandidateSlot, TimeInterval};

/// Grid step used by [`find_common`].
pub const DEFAULT_RESOLUTION_MINUTES: i64 = 15;

/// Find candidate slots of `duration_minutes` on a 15-minute grid.
///
/// See [`find_common_with_resolution`].
pub fn find_common(
    availabilities: &[AttendeeAvailability],
    duration_minutes: i64,
) -> Vec<CandidateSlot> {
    find_common_with_resolution(availabilities, duration_minutes, DEFAULT_RESOLUTION_MINUTES)
}

/// Find candidate slots of `duration_minutes` on a grid of
/// `resolution_minutes`.
///
/// Candidates are returned in start order, unranked and possibly
/// overlapping. Each candidate's `available_attendees` follows the order of
/// `availabilities`, and its confidence is computed against
/// `availabilities.len()`, so attendees with no free time still count.
///
/// Returns an empty list when there are no attendees, no free time, a
/// non-positive duration or resolution, or a duration longer than the span
/// between the earliest free start and the latest free end.
pub fn find_common_with_resolution(
    availabilities: &[AttendeeAvailability],
    duration_minutes: i64,
    resolution_minutes: i64,
) -> Vec<CandidateSlot> {
    if availabilities.is_empty() || duration_minutes <= 0 || resolution_minutes <= 0 {
        return Vec::new();
    }

    let all_free = availabilities.iter().flat_map(|a| a.free_slots.iter());
    let Some(scan_start) = all_free.clone().map(TimeInterval::start).min() else {
        return Vec::new();
    };
    let Some(scan_end) = all_free.map(TimeInterval::end).max() else {
        return Vec::new();
    };

    let (Some(step), Some(duration)) = (
        Duration::try_minutes(resolution_minutes),
        Duration::try_minutes(duration_minutes),
    ) else {
        return Vec::new();
    };
    if duration > scan_end - scan_start {
        return Vec::new();
    }

    let grid = build_grid(scan_start, scan_end, step);
    let coverage = coverage(availabilities, &grid);

    // Grid points t0 + k * step with k * step < duration.
    let steps = duration_minutes / resolution_minutes
        + i64::from(duration_minutes % resolution_minutes != 0);
    let total = availabilities.len() as f64;

    let mut candidates = Vec::new();
    for (i, t0) in grid.iter().enumerate() {
        if coverage[i].is_empty() {
            continue;
        }

        let mut still_available = coverage[i].clone();
        for k in 1..steps as usize {
            match coverage.get(i + k) {
                Some(present) => still_available.retain(|a| present.binary_search(a).is_ok()),
                None => still_available.clear(),
            }
            if still_available.is_empty() {
                break;
            }
        }

        if still_available.is_empty() {
            continue;
        }
        let Some(end) = t0.checked_add_signed(duration) else {
            continue;
        };

        candidates.push(CandidateSlot {
            start: *t0,
            end,
            confidence: still_available.len() as f64 / total,
            available_attendees: still_available
                .iter()
                .map(|&a| availabilities[a].attendee_id.clone())
                .collect(),
        });
    }

    candidates
}

/// Grid points in `[scan_start, scan_end)` spaced by `step`.
fn build_grid(scan_start: DateTime<Utc>, scan_end: DateTime<Utc>, step: Duration) -> Vec<DateTime<Utc>> {
    let mut grid = Vec::new();
    let mut t = scan_start;
    while t < scan_end {
        grid.push(t);
        match t.checked_add_signed(step) {
            Some(next) => t = next,
            None => break,
        }
    }
    grid
}

/// For each grid point, the ascending indices of attendees free at it.
fn coverage(availabilities: &[AttendeeAvailability], grid: &[DateTime<Utc>]) -> Vec<Vec<usize>> {
    let mut coverage = vec![Vec::new(); grid.len()];

    for (attendee, availability) in availabilities.iter().enumerate() {
        let mut free = availability.free_slots.clone();
        free.sort_by_key(|slot| (slot.start(), slot.end()));

        // Grid points ascend, so intervals that ended before `t` never cover
        // a later point either.
        let mut cursor = 0;
        for (g, t) in grid.iter().enumerate() {
            while cursor < free.len() && free[cursor].end() <= *t {
                cursor += 1;
            }
            if free.get(cursor).is_some_and(|slot| slot.contains(*t)) {
                coverage[g].push(attendee);
            }
        }
    }

    coverage
}
