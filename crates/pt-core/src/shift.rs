//! Shift windows and the context derived from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minutes after a shift's end during which the shift does not count as
/// ended (late badge-outs, handover overruns).
pub const GRACE_MINUTES: i64 = 10;

/// Facts about a timestamp relative to a person's current shift window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftContext {
    /// The timestamp falls inside the shift window.
    pub in_shift: bool,
    /// The timestamp is past the window's end plus the grace period.
    pub shift_ended: bool,
}

impl ShiftContext {
    /// Context for a person with no shift window on record.
    #[must_use]
    pub const fn off_duty() -> Self {
        Self {
            in_shift: false,
            shift_ended: true,
        }
    }
}

/// A person's scheduled shift, start and end inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftWindow {
    /// Derives the shift context for a timestamp.
    #[must_use]
    pub fn context_at(&self, at: DateTime<Utc>) -> ShiftContext {
        ShiftContext {
            in_shift: at >= self.start && at <= self.end,
            shift_ended: at > self.end + Duration::minutes(GRACE_MINUTES),
        }
    }
}
