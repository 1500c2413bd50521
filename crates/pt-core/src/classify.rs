//! Event classification into priority tiers.
//!
//! The tier ranks how much trust an event's origin deserves when two
//! signals disagree about a person's status. The ranking is fixed data;
//! arbitration compares tiers by [`PriorityTier::weight`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::event::{EventKind, PresenceEvent, SourceKind};
use crate::types::ValidationError;

/// Trust/urgency rank of an event's origin, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    /// Panic signals. Never silently overridden.
    Emergency,
    /// Biometric access control.
    Biometric,
    /// Mobile geofence crossings.
    Geofence,
    /// Task assignment system.
    Task,
    /// Calendar entries and everything else.
    Calendar,
}

impl PriorityTier {
    /// Numeric rank used for arbitration. Higher wins.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Emergency => 5,
            Self::Biometric => 4,
            Self::Geofence => 3,
            Self::Task => 2,
            Self::Calendar => 1,
        }
    }

    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::Biometric => "BIOMETRIC",
            Self::Geofence => "GEOFENCE",
            Self::Task => "TASK",
            Self::Calendar => "CALENDAR",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PriorityTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMERGENCY" => Ok(Self::Emergency),
            "BIOMETRIC" => Ok(Self::Biometric),
            "GEOFENCE" => Ok(Self::Geofence),
            "TASK" => Ok(Self::Task),
            "CALENDAR" => Ok(Self::Calendar),
            _ => Err(ValidationError::UnknownTier {
                value: s.to_string(),
            }),
        }
    }
}

/// Classifies an event into its priority tier.
///
/// Total function, first match wins:
/// 1. panic kind or panic source -> `EMERGENCY`
/// 2. biometric source -> `BIOMETRIC`
/// 3. geofence kinds -> `GEOFENCE`
/// 4. task source -> `TASK`
/// 5. everything else -> `CALENDAR`
#[must_use]
pub fn classify(event: &PresenceEvent) -> PriorityTier {
    if event.kind == EventKind::Panic || event.source == SourceKind::Panic {
        return PriorityTier::Emergency;
    }
    if event.source == SourceKind::Biometric {
        return PriorityTier::Biometric;
    }
    if event.kind.is_geo() {
        return PriorityTier::Geofence;
    }
    if event.source == SourceKind::Task {
        return PriorityTier::Task;
    }
    PriorityTier::Calendar
}

/// Classifies a source alone, with no event kind available.
///
/// Used to re-derive the tier of a recorded snapshot from its provenance.
/// Without a kind the geofence rule can never fire, so mobile sources
/// classify as `CALENDAR` here.
#[must_use]
pub const fn classify_source(source: SourceKind) -> PriorityTier {
    match source {
        SourceKind::Panic => PriorityTier::Emergency,
        SourceKind::Biometric => PriorityTier::Biometric,
        SourceKind::Task => PriorityTier::Task,
        SourceKind::Mobile | SourceKind::Kiosk | SourceKind::Calendar => PriorityTier::Calendar,
    }
}
