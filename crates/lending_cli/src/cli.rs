//! Command-line argument definitions.
//!
//! Global flags fall back to `LENDING_*` environment variables; each
//! subcommand maps onto one core operation.

use clap::{Parser, Subcommand};
use lending_core::{CardId, LogLevel};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE: &str = "lending.sqlite3";

/// Lending - library cards, books, and who holds what
#[derive(Debug, Parser)]
#[command(name = "lending")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the lending database file
    #[arg(long, global = true, env = "LENDING_DB", default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "LENDING_LOG_LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "LENDING_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Issue a new active card for an owner identity
    IssueCard {
        #[arg(value_name = "OWNER")]
        owner: String,
    },

    /// Revoke a card; borrowed books stay on it
    RevokeCard {
        #[arg(value_name = "CARD_ID")]
        card_id: CardId,
    },

    /// Register a book (overwrites an existing title)
    CreateBook {
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Check a book out on a card
    IssueBook {
        #[arg(value_name = "CARD_ID")]
        card_id: CardId,
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Check a book back in through a card
    ReturnBook {
        #[arg(value_name = "CARD_ID")]
        card_id: CardId,
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// List every registered book
    ListBooks,

    /// List titles a card currently holds
    ListBorrowed {
        #[arg(value_name = "CARD_ID")]
        card_id: CardId,
    },

    /// List registered titles a card is not holding
    ListReturned {
        #[arg(value_name = "CARD_ID")]
        card_id: CardId,
    },

    /// List active cards
    ListActiveCards,

    /// List revoked cards
    ListInactiveCards,

    /// Show one card
    ShowCard {
        #[arg(value_name = "CARD_ID")]
        card_id: CardId,
    },

    /// Show one book
    ShowBook {
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Print the core library version
    Version,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    value.parse().map_err(|err: lending_core::LoggingError| err.to_string())
}
