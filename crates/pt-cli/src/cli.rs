//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Real-time personnel presence tracker.
///
/// Ingests heterogeneous presence events (biometric scans, geofence
/// crossings, task assignments, panic buttons, calendar entries) and
/// resolves them into one authoritative status per person.
#[derive(Debug, Parser)]
#[command(name = "pt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a single presence event and resolve the person's status.
    Submit {
        /// The person the event is about.
        #[arg(long)]
        person: String,

        /// The originating system (mobile, kiosk, biometric, task,
        /// calendar, panic).
        #[arg(long)]
        source: String,

        /// The reported action (entry, exit, checkin, checkout, assigned,
        /// completed, panic, geo_enter, geo_exit).
        #[arg(long)]
        kind: String,

        /// Event timestamp (RFC 3339). Defaults to now.
        #[arg(long)]
        ts: Option<String>,

        /// Optional JSON payload with source-specific context.
        #[arg(long)]
        payload: Option<String>,
    },

    /// Replay presence events from a JSONL file in file order.
    Replay {
        /// File with one JSON event per line.
        file: PathBuf,
    },

    /// Show the current status of one or all people.
    Status {
        /// Limit to a single person.
        #[arg(long)]
        person: Option<String>,

        /// Only show people in this status (e.g. busy, ON_SHIFT).
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show the snapshot history for a person.
    History {
        /// The person to query.
        #[arg(long)]
        person: String,

        /// Only snapshots at or after this timestamp (RFC 3339).
        #[arg(long)]
        from: Option<String>,

        /// Only snapshots at or before this timestamp (RFC 3339).
        #[arg(long)]
        to: Option<String>,
    },

    /// Register a person's shift window.
    Shift {
        /// The person the shift belongs to.
        #[arg(long)]
        person: String,

        /// Shift start (RFC 3339).
        #[arg(long)]
        start: String,

        /// Shift end (RFC 3339).
        #[arg(long)]
        end: String,
    },

    /// Show the audit log tail for a person.
    Audit {
        /// The person to query.
        #[arg(long)]
        person: String,

        /// Maximum number of entries.
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Report snapshot totals by status.
    Report {
        /// Only count snapshots at or after this timestamp (RFC 3339).
        #[arg(long)]
        from: Option<String>,

        /// Only count snapshots at or before this timestamp (RFC 3339).
        #[arg(long)]
        to: Option<String>,
    },
}
