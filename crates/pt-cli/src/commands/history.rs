//! History command: a person's snapshot history.

use std::io::Write;

use anyhow::Result;
use pt_db::Database;

use super::util::{parse_optional_datetime, parse_person, write_snapshot_line};

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    person: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let person = parse_person(person)?;
    let from = parse_optional_datetime(from)?;
    let to = parse_optional_datetime(to)?;

    let history = db.snapshot_history(&person, from, to)?;
    if history.is_empty() {
        writeln!(writer, "No snapshots for {person}.")?;
        return Ok(());
    }
    for snapshot in &history {
        write_snapshot_line(writer, snapshot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pt_core::{PersonId, PriorityTier, StatusKind, StatusSnapshot};

    #[test]
    fn history_prints_bounded_range_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for (status, ts, reason) in [
            (StatusKind::OnShift, "2024-01-01T08:00:00Z", "biometric entry"),
            (StatusKind::Busy, "2024-01-01T10:00:00Z", "task assigned"),
            (StatusKind::OffShift, "2024-01-01T16:30:00Z", "biometric exit"),
        ] {
            db.append_snapshot(&StatusSnapshot {
                person_id: PersonId::new("p-1").unwrap(),
                status,
                timestamp: ts.parse().unwrap(),
                source: "biometric".to_string(),
                reason: reason.to_string(),
                tier: PriorityTier::Biometric,
            })
            .unwrap();
        }

        let mut output = Vec::new();
        run(&mut output, &db, "p-1", None, Some("2024-01-01T12:00:00Z")).unwrap();
        let output = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("task assigned"));
        assert!(lines[1].contains("biometric entry"));
    }

    #[test]
    fn history_for_unknown_person_prints_placeholder() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, "p-x", None, None).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "No snapshots for p-x.\n"
        );
    }
}
