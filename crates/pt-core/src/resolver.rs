//! The composition root: one event in, one resolved snapshot out.

use crate::arbiter::arbitrate;
use crate::event::PresenceEvent;
use crate::rules::evaluate;
use crate::shift::ShiftContext;
use crate::status::StatusSnapshot;

/// Resolves a person's authoritative status for a new event.
///
/// Pure and deterministic: evaluates the rule table, attaches the event's
/// classified tier, then arbitrates the candidate against the current
/// snapshot. The result is a proposal only - the caller decides whether it
/// warrants a persistence write and a change notification by comparing
/// status and reason against the current snapshot
/// ([`StatusSnapshot::differs_from`]).
///
/// For a single person, callers must strictly serialize the
/// read-current/decide/write-new sequence (single-writer queue or
/// compare-and-set with retry); concurrent decisions for different people
/// need no coordination.
#[must_use]
pub fn decide(
    event: &PresenceEvent,
    current: Option<&StatusSnapshot>,
    ctx: ShiftContext,
) -> StatusSnapshot {
    let candidate = evaluate(event, current, ctx);
    let proposed = StatusSnapshot {
        person_id: event.person_id.clone(),
        status: candidate.status,
        timestamp: event.timestamp,
        source: event.source.as_str().to_string(),
        reason: candidate.reason.to_string(),
        tier: candidate.tier,
    };
    let resolved = arbitrate(proposed, current);
    tracing::debug!(
        person = %resolved.person_id,
        status = %resolved.status,
        reason = %resolved.reason,
        tier = %resolved.tier,
        "status resolved"
    );
    resolved
}
