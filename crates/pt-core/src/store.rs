//! Collaborator contracts at the engine boundary.
//!
//! The engine only computes decisions; fetching the current snapshot,
//! deriving shift context, and persisting accepted results are the
//! caller's job. These traits name those collaborations so the pipeline
//! around [`crate::decide`] can be written once and tested against fakes.

use chrono::{DateTime, Utc};

use crate::shift::ShiftContext;
use crate::status::StatusSnapshot;
use crate::types::PersonId;

/// Append-only storage of status snapshots.
pub trait SnapshotStore {
    type Error;

    /// Returns the person's current snapshot, if any.
    fn latest(&self, person: &PersonId) -> Result<Option<StatusSnapshot>, Self::Error>;

    /// Appends an accepted snapshot. Never edits existing history.
    fn append(&self, snapshot: &StatusSnapshot) -> Result<(), Self::Error>;
}

/// Supplies shift context for a person at a timestamp.
pub trait ShiftContextProvider {
    type Error;

    /// Derives the shift context; a person without a shift window on
    /// record is off duty.
    fn context_at(&self, person: &PersonId, at: DateTime<Utc>)
    -> Result<ShiftContext, Self::Error>;
}
