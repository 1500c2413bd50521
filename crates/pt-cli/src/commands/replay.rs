//! Replay command: ingest a JSONL file of presence events.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use pt_core::PresenceEvent;
use pt_db::Database;

/// Ingests events from `path` in file order.
///
/// File order is processing order, so the per-person serialization the
/// resolution pipeline requires holds by construction.
pub fn run<W: Write>(writer: &mut W, db: &Database, path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut total = 0usize;
    let mut changed = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: PresenceEvent = serde_json::from_str(&line)
            .with_context(|| format!("invalid event on line {}", index + 1))?;
        let applied = crate::apply::ingest(db, &event)?;
        total += 1;
        if applied.changed {
            changed += 1;
        }
    }

    writeln!(writer, "replayed {total} events, {changed} status changes")?;
    Ok(())
}
