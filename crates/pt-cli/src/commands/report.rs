//! Report command: snapshot totals by status.

use std::io::Write;

use anyhow::Result;
use pt_db::Database;

use super::util::parse_optional_datetime;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let from = parse_optional_datetime(from)?;
    let to = parse_optional_datetime(to)?;

    let totals = db.status_totals(from, to)?;
    if totals.is_empty() {
        writeln!(writer, "No snapshots recorded.")?;
        return Ok(());
    }
    for total in &totals {
        writeln!(writer, "{:<10}  {}", total.status, total.count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use pt_core::{PersonId, PriorityTier, StatusKind, StatusSnapshot};

    #[test]
    fn report_prints_totals_sorted_by_status() {
        let db = Database::open_in_memory().unwrap();
        for (person, status, ts) in [
            ("p-a", StatusKind::Busy, "2024-01-01T09:00:00Z"),
            ("p-b", StatusKind::Busy, "2024-01-01T10:00:00Z"),
            ("p-c", StatusKind::Emergency, "2024-01-01T11:00:00Z"),
        ] {
            db.append_snapshot(&StatusSnapshot {
                person_id: PersonId::new(person).unwrap(),
                status,
                timestamp: ts.parse().unwrap(),
                source: "task".to_string(),
                reason: "test".to_string(),
                tier: PriorityTier::Task,
            })
            .unwrap();
        }

        let mut output = Vec::new();
        run(&mut output, &db, None, None).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        BUSY        2
        EMERGENCY   1
        ");
    }

    #[test]
    fn report_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, None, None).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No snapshots recorded.\n");
    }
}
