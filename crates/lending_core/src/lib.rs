//! Core domain logic for library lending records.
//! This crate is the single source of truth for card and book invariants.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use error::{LendingError, LendingResult};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::book::Book;
pub use model::card::{CardId, LibraryCard, Owner};
pub use service::card_service::CardRegistry;
pub use service::lending_service::LendingEngine;
pub use service::query_service::LibraryQueries;
pub use store::{
    BookStore, CardStore, LibraryStore, SqliteLibraryStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
