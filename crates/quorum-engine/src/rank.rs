//! Rank candidate slots by confidence and drop overlapping ones.

use crate::interval::CandidateSlot;

/// Number of slots [`rank`] keeps unless told otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Sort `candidates` by confidence (highest first), drop any candidate that
/// overlaps one already accepted, and keep at most `max_results`.
///
/// The sort is stable, so equal-confidence candidates keep their input order
/// (chronological when fed straight from the sweep). Adjacent slots, where
/// one ends exactly when the next starts, are not overlaps and both survive.
pub fn rank(mut candidates: Vec<CandidateSlot>, max_results: usize) -> Vec<CandidateSlot> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut accepted: Vec<CandidateSlot> = Vec::with_capacity(max_results.min(candidates.len()));
    for candidate in candidates {
        if accepted.len() >= max_results {
            break;
        }
        if accepted.iter().any(|kept| kept.overlaps(&candidate)) {
            continue;
        }
        accepted.push(candidate);
    }

    accepted
}
