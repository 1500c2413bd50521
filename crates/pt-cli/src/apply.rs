//! The caller-side resolution pipeline around the engine.
//!
//! The engine only computes; this module does the read-current -> decide ->
//! compare -> append sequence the engine's contract leaves to callers, plus
//! the audit entry for accepted changes. Calls for the same person must be
//! strictly serialized; the CLI satisfies this by being a single
//! single-threaded writer.

use anyhow::{Context, Result};
use pt_core::{PresenceEvent, ShiftContextProvider, SnapshotStore, StatusSnapshot};
use pt_db::Database;
use uuid::Uuid;

/// Outcome of running one event through the pipeline.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The authoritative snapshot after this event.
    pub snapshot: StatusSnapshot,
    /// The snapshot that was current before this event, if any.
    pub previous: Option<StatusSnapshot>,
    /// Whether the result was persisted (status or reason changed).
    pub changed: bool,
}

/// Resolves one event against the stored state and persists the result
/// only when status or reason changed.
pub fn apply_event<S, P, E>(snapshots: &S, shifts: &P, event: &PresenceEvent) -> Result<Applied, E>
where
    S: SnapshotStore<Error = E>,
    P: ShiftContextProvider<Error = E>,
{
    let previous = snapshots.latest(&event.person_id)?;
    let ctx = shifts.context_at(&event.person_id, event.timestamp)?;
    let snapshot = pt_core::decide(event, previous.as_ref(), ctx);
    let changed = snapshot.differs_from(previous.as_ref());
    if changed {
        snapshots.append(&snapshot)?;
    }
    Ok(Applied {
        snapshot,
        previous,
        changed,
    })
}

/// Full ingestion: logs the event, resolves it, audits accepted changes.
pub fn ingest(db: &Database, event: &PresenceEvent) -> Result<Applied> {
    let event_id = Uuid::new_v4().to_string();
    db.record_event(&event_id, event)
        .context("failed to record event")?;

    let applied = apply_event(db, db, event).context("failed to resolve status")?;

    if applied.changed {
        let from = applied.previous.as_ref().map(|prev| prev.status.as_str());
        db.record_audit(
            &event.person_id,
            "status_change",
            &serde_json::json!({
                "from": from,
                "to": applied.snapshot.status.as_str(),
                "reason": applied.snapshot.reason,
            }),
        )
        .context("failed to record audit entry")?;
        tracing::info!(
            person = %event.person_id,
            from = from.unwrap_or("none"),
            to = %applied.snapshot.status,
            reason = %applied.snapshot.reason,
            "status changed"
        );
    } else {
        tracing::debug!(person = %event.person_id, "event produced no status change");
    }

    Ok(applied)
}
