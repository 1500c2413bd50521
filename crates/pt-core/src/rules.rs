//! The status rule table.
//!
//! A flat, priority-ordered decision table over `(source, kind)` pairs,
//! first match wins. It is not a state machine: the same status can be
//! reached from several sources and no transition is forbidden. Unmatched
//! combinations fall through to "no change", which is how event kinds
//! added later degrade gracefully.

use crate::classify::{PriorityTier, classify};
use crate::event::{EventKind, PresenceEvent, SourceKind};
use crate::shift::ShiftContext;
use crate::status::{StatusKind, StatusSnapshot};

/// A proposed new status, before arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub status: StatusKind,
    pub reason: &'static str,
    pub tier: PriorityTier,
}

/// Evaluates the rule table for an event.
///
/// The exact reason strings are load-bearing: downstream consumers key
/// escalation and reset behavior off them, so they must not be reworded.
#[must_use]
pub fn evaluate(
    event: &PresenceEvent,
    current: Option<&StatusSnapshot>,
    ctx: ShiftContext,
) -> Candidate {
    let tier = classify(event);
    let (status, reason) = match (event.source, event.kind) {
        (_, EventKind::Panic) => (StatusKind::Emergency, "panic button"),
        (SourceKind::Biometric, EventKind::Entry) => (StatusKind::OnShift, "biometric entry"),
        (SourceKind::Biometric, EventKind::Exit) => (StatusKind::OffShift, "biometric exit"),
        (SourceKind::Task, EventKind::Assigned) => (StatusKind::Busy, "task assigned"),
        (SourceKind::Task, EventKind::Completed) => (StatusKind::Available, "task completed"),
        (SourceKind::Mobile, EventKind::GeoEnter) if ctx.in_shift => {
            (StatusKind::Available, "entered geofenced zone")
        }
        (SourceKind::Mobile, EventKind::GeoEnter) => (StatusKind::OnShift, "entry outside shift"),
        (SourceKind::Mobile, EventKind::GeoExit) => (StatusKind::Break, "left geofenced zone"),
        (_, EventKind::Entry | EventKind::Checkin) => (StatusKind::Available, "check-in"),
        (_, EventKind::Exit | EventKind::Checkout) => (StatusKind::OffShift, "check-out"),
        _ if ctx.shift_ended => (StatusKind::OffShift, "shift ended"),
        _ => (
            current.map_or(StatusKind::OffShift, |snap| snap.status),
            "no change",
        ),
    };
    Candidate {
        status,
        reason,
        tier,
    }
}
