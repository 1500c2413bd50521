//! Shift command: register a person's shift window.

use std::io::Write;

use anyhow::{Result, ensure};
use pt_core::ShiftWindow;
use pt_db::Database;

use super::util::{parse_datetime, parse_person};

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    person: &str,
    start: &str,
    end: &str,
) -> Result<()> {
    let person = parse_person(person)?;
    let window = ShiftWindow {
        start: parse_datetime(start)?,
        end: parse_datetime(end)?,
    };
    ensure!(
        window.start < window.end,
        "shift start must be before its end"
    );

    db.add_shift(&person, &window)?;
    writeln!(
        writer,
        "shift recorded for {person}: {} to {}",
        start, end
    )?;
    Ok(())
}
