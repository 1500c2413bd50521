//! Status command: current snapshot for one or all people.

use std::io::Write;

use anyhow::Result;
use pt_db::{Database, parse_status_filter};

use super::util::{parse_person, write_snapshot_line};

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    person: Option<&str>,
    filter: Option<&str>,
) -> Result<()> {
    let filter = filter.map(parse_status_filter).transpose()?;

    let snapshots = match person {
        Some(person) => db
            .latest_snapshot(&parse_person(person)?)?
            .into_iter()
            .collect(),
        None => db.current_statuses()?,
    };

    let mut shown = 0usize;
    for snapshot in &snapshots {
        if filter.is_some_and(|status| snapshot.status != status) {
            continue;
        }
        write_snapshot_line(writer, snapshot)?;
        shown += 1;
    }
    if shown == 0 {
        writeln!(writer, "No status on record.")?;
    }
    Ok(())
}
