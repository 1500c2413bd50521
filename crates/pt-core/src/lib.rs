//! Status resolution engine for the presence tracker.
//!
//! Given a new presence event, the person's currently recorded status, and
//! shift context, [`decide`] computes the person's new authoritative
//! status. The engine is pure and stateless; persistence, transport, and
//! notification live behind the [`store`] contracts.
//!
//! Pipeline: [`classify`] ranks the event's origin, [`evaluate`] proposes a
//! candidate status from the rule table, [`arbitrate`] settles the
//! candidate against the current snapshot by tier weight and timestamp.

pub mod arbiter;
pub mod classify;
pub mod event;
pub mod rules;
pub mod shift;
pub mod status;
pub mod store;
pub mod types;

mod resolver;

pub use arbiter::arbitrate;
pub use classify::{PriorityTier, classify, classify_source};
pub use event::{EventKind, PresenceEvent, SourceKind};
pub use resolver::decide;
pub use rules::{Candidate, evaluate};
pub use shift::{GRACE_MINUTES, ShiftContext, ShiftWindow};
pub use status::{StatusKind, StatusSnapshot};
pub use store::{ShiftContextProvider, SnapshotStore};
pub use types::{PersonId, ValidationError};
