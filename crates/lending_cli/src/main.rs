//! Command-line surface over `lending_core`.
//!
//! # Responsibility
//! - Resolve settings, start logging, open the database.
//! - Run one operation and print its result as JSON.

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Settings;
use lending_core::db::open_db;
use lending_core::{init_logging, SqliteLibraryStore};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_cli(&cli)?;
    if let Some(log_dir) = &settings.log_dir {
        init_logging(settings.log_level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&settings.db_path)
        .with_context(|| format!("failed to open database `{}`", settings.db_path.display()))?;
    let store = SqliteLibraryStore::try_new(&conn)?;

    let output = commands::execute(store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
