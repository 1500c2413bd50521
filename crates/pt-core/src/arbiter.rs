//! Priority arbitration between a candidate and the current snapshot.
//!
//! A priority-weighted last-writer-wins merge over a single logical
//! timeline per person. It is not a causal/vector-clock scheme: it trusts
//! that event sources supply reasonably synchronized timestamps.

use crate::status::StatusSnapshot;

/// Decides whether `candidate` replaces `current`.
///
/// - No current snapshot: the candidate is accepted unconditionally.
/// - Higher candidate tier weight: accepted, regardless of timestamps.
///   A stale panic must still override a fresh calendar entry.
/// - Equal weight: accepted only if the candidate's timestamp is not older
///   (ties go to the new event, last write wins at equal trust).
/// - Lower weight: rejected; the current snapshot is returned with its tier
///   re-derived from its recorded source.
///
/// The current snapshot's tier is always compared in its re-derived form;
/// see [`StatusSnapshot::normalized_tier`].
#[must_use]
pub fn arbitrate(candidate: StatusSnapshot, current: Option<&StatusSnapshot>) -> StatusSnapshot {
    let Some(current) = current else {
        return candidate;
    };

    let current_tier = current.normalized_tier();
    if candidate.tier.weight() > current_tier.weight() {
        return candidate;
    }
    if candidate.tier.weight() == current_tier.weight() && candidate.timestamp >= current.timestamp
    {
        return candidate;
    }

    let mut kept = current.clone();
    kept.tier = current_tier;
    kept
}
