//! Property-based tests for free-interval derivation, the sweep, and ranking.
//!
//! These check invariants that should hold for *any* set of busy slots, not
//! just the hand-picked cases in the other test files.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use quorum_engine::{
    derive_free, find_common, rank, AttendeeAvailability, BusinessCalendarPolicy, BusySlot,
    DEFAULT_MAX_RESULTS,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Monday 2024-02-12, 00:00 UTC.
fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 12, 0, 0, 0).unwrap()
}

/// A busy slot on Monday between 07:00 and 20:00, on a 5-minute grid, so it
/// may straddle either end of the business window.
fn arb_busy() -> impl Strategy<Value = BusySlot> {
    (84u32..240, 1u32..60).prop_map(|(start_step, len_steps)| {
        let start = monday() + Duration::minutes(i64::from(start_step) * 5);
        let end = start + Duration::minutes(i64::from(len_steps) * 5);
        BusySlot::new(start, end, "busy").unwrap()
    })
}

fn arb_calendar() -> impl Strategy<Value = Vec<BusySlot>> {
    prop::collection::vec(arb_busy(), 0..8)
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60), Just(90), 5i64..=240]
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn free_on_monday(busy: &[BusySlot]) -> Vec<quorum_engine::TimeInterval> {
    derive_free(
        busy,
        monday(),
        monday() + Duration::hours(23),
        &BusinessCalendarPolicy::default(),
    )
}

fn total_free_minutes(busy: &[BusySlot]) -> i64 {
    free_on_monday(busy)
        .iter()
        .map(|slot| slot.duration_minutes())
        .sum()
}

fn availabilities(calendars: &[Vec<BusySlot>]) -> Vec<AttendeeAvailability> {
    calendars
        .iter()
        .enumerate()
        .map(|(i, busy)| AttendeeAvailability {
            attendee_id: format!("attendee-{i}"),
            free_slots: free_on_monday(busy),
            busy_slots: busy.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Every business minute is either free or busy, never both, never neither.
    #[test]
    fn free_and_busy_partition_business_hours(busy in arb_calendar()) {
        let free = free_on_monday(&busy);
        let open = monday() + Duration::hours(9);

        for minute in 0..(9 * 60) {
            let t = open + Duration::minutes(minute);
            let is_free = free.iter().any(|slot| slot.contains(t));
            let is_busy = busy.iter().any(|slot| slot.interval.contains(t));
            prop_assert!(is_free != is_busy, "minute {} free={} busy={}", t, is_free, is_busy);
            prop_assert!(free.iter().filter(|slot| slot.contains(t)).count() <= 1);
        }
    }

    /// Free intervals are sorted, disjoint, and inside business hours.
    #[test]
    fn free_intervals_are_ordered_and_within_business_hours(busy in arb_calendar()) {
        let free = free_on_monday(&busy);
        let open = monday() + Duration::hours(9);
        let close = monday() + Duration::hours(18);

        for slot in &free {
            prop_assert!(slot.start() >= open && slot.end() <= close);
        }
        for pair in free.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start());
            prop_assert!(!pair[0].overlaps(&pair[1]));
        }
    }

    /// Adding a busy slot never increases free time.
    #[test]
    fn extra_busy_slot_never_adds_free_time(busy in arb_calendar(), extra in arb_busy()) {
        let before = total_free_minutes(&busy);
        let mut more = busy.clone();
        more.push(extra);
        prop_assert!(total_free_minutes(&more) <= before);
    }

    /// Confidence is a fraction of attendees and is 1.0 exactly for a full quorum.
    #[test]
    fn confidence_is_bounded_and_exact(
        calendars in prop::collection::vec(arb_calendar(), 1..5),
        duration in arb_duration(),
    ) {
        let attendees = availabilities(&calendars);
        for candidate in find_common(&attendees, duration) {
            prop_assert!(candidate.confidence > 0.0 && candidate.confidence <= 1.0);
            prop_assert_eq!(
                candidate.confidence == 1.0,
                candidate.available_attendees.len() == attendees.len()
            );
            prop_assert_eq!(candidate.end - candidate.start, Duration::minutes(duration));
        }
    }

    /// Ranked output is bounded, sorted by confidence, and never overlaps.
    #[test]
    fn ranked_slots_do_not_overlap(
        calendars in prop::collection::vec(arb_calendar(), 1..5),
        duration in arb_duration(),
    ) {
        let attendees = availabilities(&calendars);
        let ranked = rank(find_common(&attendees, duration), DEFAULT_MAX_RESULTS);

        prop_assert!(ranked.len() <= DEFAULT_MAX_RESULTS);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
        for (i, a) in ranked.iter().enumerate() {
            for b in &ranked[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }

    /// Same input, same ranked output.
    #[test]
    fn sweep_and_rank_are_deterministic(
        calendars in prop::collection::vec(arb_calendar(), 1..4),
        duration in arb_duration(),
    ) {
        let attendees = availabilities(&calendars);
        let first = rank(find_common(&attendees, duration), DEFAULT_MAX_RESULTS);
        let second = rank(find_common(&attendees, duration), DEFAULT_MAX_RESULTS);
        prop_assert_eq!(first, second);
    }
}
