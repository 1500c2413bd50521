//! Submit command: ingest one presence event and resolve the status.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use pt_core::{EventKind, PresenceEvent, SourceKind};
use pt_db::Database;

use super::util::{parse_person, write_snapshot_line};

pub struct SubmitArgs<'a> {
    pub person: &'a str,
    pub source: &'a str,
    pub kind: &'a str,
    pub ts: Option<&'a str>,
    pub payload: Option<&'a str>,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &SubmitArgs<'_>) -> Result<()> {
    let source: SourceKind = args.source.parse()?;
    let kind: EventKind = args.kind.parse()?;
    let timestamp = match args.ts {
        Some(ts) => super::util::parse_datetime(ts)?,
        None => Utc::now(),
    };
    let payload = args
        .payload
        .map(serde_json::from_str)
        .transpose()
        .context("invalid payload JSON")?;

    let event = PresenceEvent {
        person_id: parse_person(args.person)?,
        timestamp,
        source,
        kind,
        payload,
    };

    let applied = crate::apply::ingest(db, &event)?;
    if applied.changed {
        write_snapshot_line(writer, &applied.snapshot)?;
    } else {
        writeln!(
            writer,
            "no change: {} stays {}",
            applied.snapshot.person_id, applied.snapshot.status
        )?;
    }
    Ok(())
}
