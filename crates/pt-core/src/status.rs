//! Status snapshots - the currently believed state of a person.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{PriorityTier, classify_source};
use crate::types::{PersonId, ValidationError};

/// Authoritative presence status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    OffShift,
    OnShift,
    Available,
    Busy,
    Break,
    Absent,
    Training,
    Escalated,
    Emergency,
}

impl StatusKind {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OffShift => "OFF_SHIFT",
            Self::OnShift => "ON_SHIFT",
            Self::Available => "AVAILABLE",
            Self::Busy => "BUSY",
            Self::Break => "BREAK",
            Self::Absent => "ABSENT",
            Self::Training => "TRAINING",
            Self::Escalated => "ESCALATED",
            Self::Emergency => "EMERGENCY",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OFF_SHIFT" => Ok(Self::OffShift),
            "ON_SHIFT" => Ok(Self::OnShift),
            "AVAILABLE" => Ok(Self::Available),
            "BUSY" => Ok(Self::Busy),
            "BREAK" => Ok(Self::Break),
            "ABSENT" => Ok(Self::Absent),
            "TRAINING" => Ok(Self::Training),
            "ESCALATED" => Ok(Self::Escalated),
            "EMERGENCY" => Ok(Self::Emergency),
            _ => Err(ValidationError::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// The currently believed status of a person, with provenance.
///
/// Exactly one snapshot is logically current per person at any instant.
/// Snapshots are immutable once created; a new accepted decision supersedes
/// the previous snapshot, it never edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// The person this snapshot describes.
    pub person_id: PersonId,
    /// The believed status.
    pub status: StatusKind,
    /// Timestamp of the event that produced this snapshot.
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    /// Source of the triggering event. Kept as a free string so snapshots
    /// imported from other systems survive a round trip.
    pub source: String,
    /// Human-readable reason for the status.
    pub reason: String,
    /// Tier recorded at decision time. Arbitration re-derives the tier from
    /// `source` rather than trusting this field; see [`Self::normalized_tier`].
    pub tier: PriorityTier,
}

impl StatusSnapshot {
    /// Re-derives this snapshot's tier from its recorded source.
    ///
    /// Keeps the tier consistent with the classification rules even if they
    /// evolve after the snapshot was written. A source string that is not a
    /// known [`crate::SourceKind`] cannot be classified, so the stored tier
    /// is used as-is.
    #[must_use]
    pub fn normalized_tier(&self) -> PriorityTier {
        self.source
            .parse()
            .map_or(self.tier, |source| classify_source(source))
    }

    /// Whether persisting `self` over `previous` is warranted.
    ///
    /// A decision counts as a change when there is no previous snapshot or
    /// when status or reason differ. Equal-tier replays of the same event
    /// are accepted by arbitration but absorbed here.
    #[must_use]
    pub fn differs_from(&self, previous: Option<&Self>) -> bool {
        previous.is_none_or(|prev| self.status != prev.status || self.reason != prev.reason)
    }
}
