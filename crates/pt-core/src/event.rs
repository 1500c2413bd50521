//! Presence events reported by source systems.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PersonId, ValidationError};

/// The system a presence event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Mobile app (geofence crossings, manual check-in/out).
    Mobile,
    /// On-site kiosk terminal.
    Kiosk,
    /// Biometric access control (fingerprint, badge gate).
    Biometric,
    /// Task assignment system.
    Task,
    /// Calendar / roster entries.
    Calendar,
    /// Panic button hardware or app widget.
    Panic,
}

impl SourceKind {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Kiosk => "kiosk",
            Self::Biometric => "biometric",
            Self::Task => "task",
            Self::Calendar => "calendar",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Self::Mobile),
            "kiosk" => Ok(Self::Kiosk),
            "biometric" => Ok(Self::Biometric),
            "task" => Ok(Self::Task),
            "calendar" => Ok(Self::Calendar),
            "panic" => Ok(Self::Panic),
            _ => Err(ValidationError::UnknownSource {
                value: s.to_string(),
            }),
        }
    }
}

/// The action a presence event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Physical entry (gate, door).
    Entry,
    /// Physical exit.
    Exit,
    /// Explicit check-in.
    Checkin,
    /// Explicit check-out.
    Checkout,
    /// A task was assigned to the person.
    Assigned,
    /// A task was completed by the person.
    Completed,
    /// Panic button pressed.
    Panic,
    /// Entered a geofenced zone.
    GeoEnter,
    /// Left a geofenced zone.
    GeoExit,
}

impl EventKind {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Checkin => "checkin",
            Self::Checkout => "checkout",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Panic => "panic",
            Self::GeoEnter => "geo_enter",
            Self::GeoExit => "geo_exit",
        }
    }

    /// Whether this is a geofence crossing kind.
    #[must_use]
    pub const fn is_geo(&self) -> bool {
        matches!(self, Self::GeoEnter | Self::GeoExit)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(Self::Entry),
            "exit" => Ok(Self::Exit),
            "checkin" => Ok(Self::Checkin),
            "checkout" => Ok(Self::Checkout),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "panic" => Ok(Self::Panic),
            "geo_enter" => Ok(Self::GeoEnter),
            "geo_exit" => Ok(Self::GeoExit),
            _ => Err(ValidationError::UnknownEventKind {
                value: s.to_string(),
            }),
        }
    }
}

/// A timestamped report from a source system about a person.
///
/// Events are created once at ingestion and never mutated. Well-formedness
/// (person id, timestamp, source, kind all present) is enforced by parsing;
/// the engine itself assumes valid events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceEvent {
    /// The person this event is about.
    pub person_id: PersonId,
    /// When the event occurred.
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    /// The originating system.
    pub source: SourceKind,
    /// The reported action. Serialized as `type` to match the ingestion
    /// wire format.
    #[serde(rename = "type", alias = "kind")]
    pub kind: EventKind,
    /// Optional source-specific context as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_roundtrip_all_variants() {
        let variants = [
            SourceKind::Mobile,
            SourceKind::Kiosk,
            SourceKind::Biometric,
            SourceKind::Task,
            SourceKind::Calendar,
            SourceKind::Panic,
        ];
        for variant in &variants {
            let parsed: SourceKind = variant.as_str().parse().expect("should parse");
            assert_eq!(parsed, *variant);
        }
        assert!("badge".parse::<SourceKind>().is_err());
    }

    #[test]
    fn event_kind_roundtrip_all_variants() {
        let variants = [
            EventKind::Entry,
            EventKind::Exit,
            EventKind::Checkin,
            EventKind::Checkout,
            EventKind::Assigned,
            EventKind::Completed,
            EventKind::Panic,
            EventKind::GeoEnter,
            EventKind::GeoExit,
        ];
        for variant in &variants {
            let parsed: EventKind = variant.as_str().parse().expect("should parse");
            assert_eq!(parsed, *variant);
        }
        assert!("teleport".parse::<EventKind>().is_err());
    }

    #[test]
    fn only_geo_kinds_are_geo() {
        assert!(EventKind::GeoEnter.is_geo());
        assert!(EventKind::GeoExit.is_geo());
        assert!(!EventKind::Entry.is_geo());
        assert!(!EventKind::Panic.is_geo());
    }

    #[test]
    fn event_deserializes_wire_format() {
        let json = r#"{
            "person_id": "p-1",
            "ts": "2024-01-01T10:00:00Z",
            "source": "mobile",
            "type": "geo_enter",
            "payload": {"zone": "north-gate"}
        }"#;
        let event: PresenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.person_id.as_str(), "p-1");
        assert_eq!(event.source, SourceKind::Mobile);
        assert_eq!(event.kind, EventKind::GeoEnter);
        assert!(event.payload.is_some());
    }

    #[test]
    fn event_serializes_kind_as_type() {
        let event = PresenceEvent {
            person_id: PersonId::new("p-1").unwrap(),
            timestamp: "2024-01-01T10:00:00Z".parse().unwrap(),
            source: SourceKind::Biometric,
            kind: EventKind::Entry,
            payload: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"entry\""));
        assert!(!json.contains("payload"));
    }

    #[test]
    fn event_rejects_empty_person_id() {
        let json = r#"{
            "person_id": "",
            "timestamp": "2024-01-01T10:00:00Z",
            "source": "kiosk",
            "type": "checkin"
        }"#;
        let result: Result<PresenceEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
