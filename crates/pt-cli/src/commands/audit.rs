//! Audit command: show recent audit log entries for a person.

use std::io::Write;

use anyhow::Result;
use chrono::SecondsFormat;
use pt_db::Database;

use super::util::parse_person;

pub fn run<W: Write>(writer: &mut W, db: &Database, person: &str, limit: u32) -> Result<()> {
    let person = parse_person(person)?;
    let entries = db.audit_tail(&person, limit)?;
    if entries.is_empty() {
        writeln!(writer, "No audit entries for {person}.")?;
        return Ok(());
    }
    for entry in &entries {
        writeln!(
            writer,
            "{}  {}  {}",
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.action,
            entry.details,
        )?;
    }
    Ok(())
}
