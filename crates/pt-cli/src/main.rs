use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pt_cli::commands::{audit, history, replay, report, shift, status, submit};
use pt_cli::{Cli, Commands, Config};

/// Load config and open the database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(pt_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = pt_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Some(Commands::Submit {
            person,
            source,
            kind,
            ts,
            payload,
        }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            submit::run(
                &mut stdout,
                &db,
                &submit::SubmitArgs {
                    person,
                    source,
                    kind,
                    ts: ts.as_deref(),
                    payload: payload.as_deref(),
                },
            )?;
        }
        Some(Commands::Replay { file }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            replay::run(&mut stdout, &db, file)?;
        }
        Some(Commands::Status { person, filter }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            status::run(&mut stdout, &db, person.as_deref(), filter.as_deref())?;
        }
        Some(Commands::History { person, from, to }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            history::run(&mut stdout, &db, person, from.as_deref(), to.as_deref())?;
        }
        Some(Commands::Shift { person, start, end }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            shift::run(&mut stdout, &db, person, start, end)?;
        }
        Some(Commands::Audit { person, limit }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            audit::run(&mut stdout, &db, person, *limit)?;
        }
        Some(Commands::Report { from, to }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            report::run(&mut stdout, &db, from.as_deref(), to.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
