//! Shared utilities for CLI commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use pt_core::{PersonId, StatusSnapshot};

/// Parses an RFC 3339 datetime string.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("invalid timestamp: {s} (use RFC 3339, e.g. 2024-01-15T10:30:00Z)"))
}

/// Parses an optional RFC 3339 datetime string.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    s.map(parse_datetime).transpose()
}

/// Parses a person ID, rejecting empty input.
pub fn parse_person(s: &str) -> Result<PersonId> {
    PersonId::new(s).context("invalid person ID")
}

/// Writes one snapshot as a fixed-layout line.
pub fn write_snapshot_line<W: Write>(writer: &mut W, snapshot: &StatusSnapshot) -> Result<()> {
    writeln!(
        writer,
        "{}  {:<10}  {}  {} ({})",
        snapshot.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        snapshot.status.as_str(),
        snapshot.person_id,
        snapshot.reason,
        snapshot.source,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_accepts_rfc3339() {
        let ts = parse_datetime("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.to_rfc3339_opts(SecondsFormat::Secs, true), "2024-01-15T10:30:00Z");
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn parse_optional_datetime_passes_none_through() {
        assert!(parse_optional_datetime(None).unwrap().is_none());
        assert!(parse_optional_datetime(Some("not-a-time")).is_err());
    }
}
