//! Storage layer for the presence tracker.
//!
//! Persists presence events, status snapshots, shift windows, and the audit
//! log using `rusqlite`. Snapshots are append-only: "current status" is the
//! newest row per person, never an update in place.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. Beyond that, the resolution pipeline requires strict per-person
//! serialization of read-decide-append; a single `Database` behind one
//! writer satisfies both.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC (e.g.
//! `2024-01-15T10:30:00Z`), so lexicographic ordering matches chronological
//! ordering. Enum columns store the canonical strings from the pt-core
//! `as_str` methods.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use pt_core::{
    PersonId, PresenceEvent, ShiftContext, ShiftContextProvider, ShiftWindow, SnapshotStore,
    StatusKind, StatusSnapshot,
};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timestamp failed to parse.
    #[error("invalid timestamp in {table}: {value}")]
    TimestampParse {
        table: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored enum or ID column failed validation.
    #[error("invalid row in {table}")]
    InvalidRow {
        table: &'static str,
        #[source]
        source: pt_core::ValidationError,
    },
    /// Stored audit details were not valid JSON.
    #[error("invalid audit details: {0}")]
    InvalidAuditDetails(#[source] serde_json::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub person_id: PersonId,
    pub action: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot count for one status value, for KPI reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTotal {
    pub status: String,
    pub count: i64,
}

fn to_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_ts(table: &'static str, value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            table,
            value: value.to_string(),
            source,
        })
}

/// Raw snapshot columns as read from SQLite, parsed after the query.
struct SnapshotRow {
    person_id: String,
    status: String,
    ts: String,
    source: String,
    reason: String,
    tier: String,
}

impl SnapshotRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            person_id: row.get(0)?,
            status: row.get(1)?,
            ts: row.get(2)?,
            source: row.get(3)?,
            reason: row.get(4)?,
            tier: row.get(5)?,
        })
    }

    fn into_snapshot(self) -> Result<StatusSnapshot, DbError> {
        let invalid = |source| DbError::InvalidRow {
            table: "status_snapshots",
            source,
        };
        Ok(StatusSnapshot {
            person_id: PersonId::new(self.person_id).map_err(invalid)?,
            status: self.status.parse().map_err(invalid)?,
            timestamp: parse_ts("status_snapshots", &self.ts)?,
            source: self.source,
            reason: self.reason,
            tier: self.tier.parse().map_err(invalid)?,
        })
    }
}

const SNAPSHOT_COLUMNS: &str = "person_id, status, ts, source, reason, tier";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS presence_events (
                id TEXT PRIMARY KEY,
                person_id TEXT NOT NULL,
                ts TEXT NOT NULL,
                source TEXT NOT NULL,
                kind TEXT NOT NULL,
                payload TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_events_person_ts
                ON presence_events(person_id, ts);

            CREATE TABLE IF NOT EXISTS status_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                person_id TEXT NOT NULL,
                status TEXT NOT NULL,
                ts TEXT NOT NULL,
                source TEXT NOT NULL,
                reason TEXT NOT NULL,
                tier TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_person_ts
                ON status_snapshots(person_id, ts);

            CREATE TABLE IF NOT EXISTS shifts (
                person_id TEXT NOT NULL,
                start_ts TEXT NOT NULL,
                end_ts TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_shifts_person_end
                ON shifts(person_id, end_ts);

            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                person_id TEXT NOT NULL,
                action TEXT NOT NULL,
                details TEXT NOT NULL,
                ts TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_audit_person_ts
                ON audit_log(person_id, ts);
            ",
        )?;
        Ok(())
    }

    /// Appends a presence event to the event log.
    ///
    /// `id` is the event's unique identifier, minted at ingestion.
    pub fn record_event(&self, id: &str, event: &PresenceEvent) -> Result<(), DbError> {
        let payload = event.payload.as_ref().map(serde_json::Value::to_string);
        self.conn.execute(
            "INSERT INTO presence_events (id, person_id, ts, source, kind, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                event.person_id.as_str(),
                to_text(event.timestamp),
                event.source.as_str(),
                event.kind.as_str(),
                payload,
            ],
        )?;
        Ok(())
    }

    /// Number of events recorded for a person.
    pub fn event_count(&self, person: &PersonId) -> Result<i64, DbError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM presence_events WHERE person_id = ?1",
            params![person.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Returns the person's current snapshot, if any.
    ///
    /// At equal timestamps the later append wins, matching the arbiter's
    /// last-write-wins tie-break.
    pub fn latest_snapshot(&self, person: &PersonId) -> Result<Option<StatusSnapshot>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SNAPSHOT_COLUMNS} FROM status_snapshots
                     WHERE person_id = ?1
                     ORDER BY ts DESC, id DESC
                     LIMIT 1"
                ),
                params![person.as_str()],
                SnapshotRow::from_row,
            )
            .optional()?;
        row.map(SnapshotRow::into_snapshot).transpose()
    }

    /// Appends a snapshot. Existing history is never edited.
    pub fn append_snapshot(&self, snapshot: &StatusSnapshot) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO status_snapshots (person_id, status, ts, source, reason, tier)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                snapshot.person_id.as_str(),
                snapshot.status.as_str(),
                to_text(snapshot.timestamp),
                snapshot.source,
                snapshot.reason,
                snapshot.tier.as_str(),
            ],
        )?;
        tracing::debug!(person = %snapshot.person_id, status = %snapshot.status, "snapshot appended");
        Ok(())
    }

    /// Latest snapshot per person, ordered by person ID.
    pub fn current_statuses(&self) -> Result<Vec<StatusSnapshot>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM status_snapshots s
             WHERE s.id = (
                 SELECT id FROM status_snapshots
                 WHERE person_id = s.person_id
                 ORDER BY ts DESC, id DESC
                 LIMIT 1
             )
             ORDER BY s.person_id ASC"
        ))?;
        let rows = stmt
            .query_map([], SnapshotRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(SnapshotRow::into_snapshot).collect()
    }

    /// Snapshot history for a person, newest first, with optional bounds.
    pub fn snapshot_history(
        &self,
        person: &PersonId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StatusSnapshot>, DbError> {
        let mut conditions = vec!["person_id = ?1".to_string()];
        let mut values = vec![person.as_str().to_string()];
        if let Some(from) = from {
            values.push(to_text(from));
            conditions.push(format!("ts >= ?{}", values.len()));
        }
        if let Some(to) = to {
            values.push(to_text(to));
            conditions.push(format!("ts <= ?{}", values.len()));
        }
        let sql = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM status_snapshots
             WHERE {}
             ORDER BY ts DESC, id DESC",
            conditions.join(" AND ")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(values), SnapshotRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(SnapshotRow::into_snapshot).collect()
    }

    /// Snapshot counts grouped by status, with optional time bounds.
    pub fn status_totals(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StatusTotal>, DbError> {
        let mut conditions = Vec::new();
        let mut values = Vec::new();
        if let Some(from) = from {
            values.push(to_text(from));
            conditions.push(format!("ts >= ?{}", values.len()));
        }
        if let Some(to) = to {
            values.push(to_text(to));
            conditions.push(format!("ts <= ?{}", values.len()));
        }
        let mut sql = "SELECT status, COUNT(*) FROM status_snapshots".to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" GROUP BY status ORDER BY status ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let totals = stmt
            .query_map(rusqlite::params_from_iter(values), |row| {
                Ok(StatusTotal {
                    status: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(totals)
    }

    /// Registers a shift window for a person.
    pub fn add_shift(&self, person: &PersonId, window: &ShiftWindow) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO shifts (person_id, start_ts, end_ts) VALUES (?1, ?2, ?3)",
            params![person.as_str(), to_text(window.start), to_text(window.end)],
        )?;
        Ok(())
    }

    /// The person's most recent shift window by end time, if any.
    pub fn latest_shift(&self, person: &PersonId) -> Result<Option<ShiftWindow>, DbError> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT start_ts, end_ts FROM shifts
                 WHERE person_id = ?1
                 ORDER BY end_ts DESC
                 LIMIT 1",
                params![person.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        row.map(|(start, end)| {
            Ok(ShiftWindow {
                start: parse_ts("shifts", &start)?,
                end: parse_ts("shifts", &end)?,
            })
        })
        .transpose()
    }

    /// Appends an audit log entry.
    pub fn record_audit(
        &self,
        person: &PersonId,
        action: &str,
        details: &serde_json::Value,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO audit_log (person_id, action, details, ts) VALUES (?1, ?2, ?3, ?4)",
            params![
                person.as_str(),
                action,
                details.to_string(),
                to_text(Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// The most recent audit entries for a person, newest first.
    pub fn audit_tail(&self, person: &PersonId, limit: u32) -> Result<Vec<AuditEntry>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT action, details, ts FROM audit_log
             WHERE person_id = ?1
             ORDER BY ts DESC, id DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![person.as_str(), limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(action, details, ts)| {
                Ok(AuditEntry {
                    person_id: person.clone(),
                    action,
                    details: serde_json::from_str(&details)
                        .map_err(DbError::InvalidAuditDetails)?,
                    timestamp: parse_ts("audit_log", &ts)?,
                })
            })
            .collect()
    }
}

impl SnapshotStore for Database {
    type Error = DbError;

    fn latest(&self, person: &PersonId) -> Result<Option<StatusSnapshot>, DbError> {
        self.latest_snapshot(person)
    }

    fn append(&self, snapshot: &StatusSnapshot) -> Result<(), DbError> {
        self.append_snapshot(snapshot)
    }
}

impl ShiftContextProvider for Database {
    type Error = DbError;

    fn context_at(&self, person: &PersonId, at: DateTime<Utc>) -> Result<ShiftContext, DbError> {
        Ok(self
            .latest_shift(person)?
            .map_or_else(ShiftContext::off_duty, |window| window.context_at(at)))
    }
}

/// Parses a status string from a CLI filter into the canonical form.
///
/// Accepts lowercase input for convenience (`busy` -> `BUSY`).
pub fn parse_status_filter(value: &str) -> Result<StatusKind, pt_core::ValidationError> {
    value.to_uppercase().parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_core::{EventKind, PriorityTier, SourceKind};

    fn person(id: &str) -> PersonId {
        PersonId::new(id).unwrap()
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn snapshot(person_id: &str, status: StatusKind, at: &str) -> StatusSnapshot {
        StatusSnapshot {
            person_id: person(person_id),
            status,
            timestamp: ts(at),
            source: "task".to_string(),
            reason: "test".to_string(),
            tier: PriorityTier::Task,
        }
    }

    #[test]
    fn open_creates_schema_on_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("pt.db");
        let db = Database::open(&path).expect("open db");
        assert!(db.latest_snapshot(&person("p-1")).unwrap().is_none());
        drop(db);
        // Reopen is idempotent.
        Database::open(&path).expect("reopen db");
    }

    #[test]
    fn snapshot_roundtrip_and_latest_ordering() {
        let db = Database::open_in_memory().unwrap();
        let p = person("p-1");

        db.append_snapshot(&snapshot("p-1", StatusKind::OnShift, "2024-01-01T08:00:00Z"))
            .unwrap();
        db.append_snapshot(&snapshot("p-1", StatusKind::Busy, "2024-01-01T10:00:00Z"))
            .unwrap();

        let latest = db.latest_snapshot(&p).unwrap().expect("has snapshot");
        assert_eq!(latest.status, StatusKind::Busy);
        assert_eq!(latest.timestamp, ts("2024-01-01T10:00:00Z"));
        assert_eq!(latest.tier, PriorityTier::Task);
    }

    #[test]
    fn equal_timestamps_prefer_later_append() {
        let db = Database::open_in_memory().unwrap();
        let p = person("p-1");

        db.append_snapshot(&snapshot("p-1", StatusKind::Available, "2024-01-01T10:00:00Z"))
            .unwrap();
        db.append_snapshot(&snapshot("p-1", StatusKind::Break, "2024-01-01T10:00:00Z"))
            .unwrap();

        let latest = db.latest_snapshot(&p).unwrap().unwrap();
        assert_eq!(latest.status, StatusKind::Break);
    }

    #[test]
    fn current_statuses_returns_one_row_per_person() {
        let db = Database::open_in_memory().unwrap();

        db.append_snapshot(&snapshot("p-a", StatusKind::OnShift, "2024-01-01T08:00:00Z"))
            .unwrap();
        db.append_snapshot(&snapshot("p-a", StatusKind::OffShift, "2024-01-01T16:00:00Z"))
            .unwrap();
        db.append_snapshot(&snapshot("p-b", StatusKind::Busy, "2024-01-01T09:00:00Z"))
            .unwrap();

        let current = db.current_statuses().unwrap();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].person_id.as_str(), "p-a");
        assert_eq!(current[0].status, StatusKind::OffShift);
        assert_eq!(current[1].person_id.as_str(), "p-b");
        assert_eq!(current[1].status, StatusKind::Busy);
    }

    #[test]
    fn history_respects_bounds() {
        let db = Database::open_in_memory().unwrap();
        let p = person("p-1");
        for (status, at) in [
            (StatusKind::OnShift, "2024-01-01T08:00:00Z"),
            (StatusKind::Busy, "2024-01-01T10:00:00Z"),
            (StatusKind::OffShift, "2024-01-01T16:00:00Z"),
        ] {
            db.append_snapshot(&snapshot("p-1", status, at)).unwrap();
        }

        let all = db.snapshot_history(&p, None, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].status, StatusKind::OffShift, "newest first");

        let bounded = db
            .snapshot_history(
                &p,
                Some(ts("2024-01-01T09:00:00Z")),
                Some(ts("2024-01-01T12:00:00Z")),
            )
            .unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].status, StatusKind::Busy);
    }

    #[test]
    fn status_totals_groups_by_status() {
        let db = Database::open_in_memory().unwrap();
        db.append_snapshot(&snapshot("p-a", StatusKind::Busy, "2024-01-01T09:00:00Z"))
            .unwrap();
        db.append_snapshot(&snapshot("p-b", StatusKind::Busy, "2024-01-01T10:00:00Z"))
            .unwrap();
        db.append_snapshot(&snapshot("p-c", StatusKind::OffShift, "2024-01-01T11:00:00Z"))
            .unwrap();

        let totals = db.status_totals(None, None).unwrap();
        assert_eq!(
            totals,
            vec![
                StatusTotal {
                    status: "BUSY".to_string(),
                    count: 2
                },
                StatusTotal {
                    status: "OFF_SHIFT".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn shift_context_uses_latest_window_and_grace() {
        let db = Database::open_in_memory().unwrap();
        let p = person("p-1");

        // No shift on record: off duty.
        let ctx = db.context_at(&p, ts("2024-01-01T12:00:00Z")).unwrap();
        assert_eq!(ctx, ShiftContext::off_duty());

        db.add_shift(
            &p,
            &ShiftWindow {
                start: ts("2024-01-01T08:00:00Z"),
                end: ts("2024-01-01T16:00:00Z"),
            },
        )
        .unwrap();

        let ctx = db.context_at(&p, ts("2024-01-01T12:00:00Z")).unwrap();
        assert!(ctx.in_shift);
        assert!(!ctx.shift_ended);

        // Within grace after the end.
        let ctx = db.context_at(&p, ts("2024-01-01T16:05:00Z")).unwrap();
        assert!(!ctx.in_shift);
        assert!(!ctx.shift_ended);

        // Past grace.
        let ctx = db.context_at(&p, ts("2024-01-01T16:11:00Z")).unwrap();
        assert!(ctx.shift_ended);
    }

    #[test]
    fn events_are_recorded_with_payload() {
        let db = Database::open_in_memory().unwrap();
        let event = PresenceEvent {
            person_id: person("p-1"),
            timestamp: ts("2024-01-01T10:00:00Z"),
            source: SourceKind::Mobile,
            kind: EventKind::GeoEnter,
            payload: Some(serde_json::json!({"zone": "north-gate"})),
        };
        db.record_event("evt-1", &event).unwrap();
        assert_eq!(db.event_count(&person("p-1")).unwrap(), 1);

        // Duplicate IDs are rejected by the primary key.
        assert!(db.record_event("evt-1", &event).is_err());
    }

    #[test]
    fn audit_tail_returns_newest_first_up_to_limit() {
        let db = Database::open_in_memory().unwrap();
        let p = person("p-1");
        for i in 0..3 {
            db.record_audit(
                &p,
                "status_change",
                &serde_json::json!({"from": "OFF_SHIFT", "to": "ON_SHIFT", "seq": i}),
            )
            .unwrap();
        }

        let tail = db.audit_tail(&p, 2).unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].action, "status_change");
        assert_eq!(tail[0].details["seq"], 2);
        assert_eq!(tail[1].details["seq"], 1);
    }

    #[test]
    fn status_filter_accepts_lowercase() {
        assert_eq!(parse_status_filter("busy").unwrap(), StatusKind::Busy);
        assert_eq!(
            parse_status_filter("OFF_SHIFT").unwrap(),
            StatusKind::OffShift
        );
        assert!(parse_status_filter("idle").is_err());
    }
}
