//! Storage contracts for the card and book collections.
//!
//! # Responsibility
//! - Describe the ordered key-value interface the lending services need.
//! - Isolate SQL details behind `SqliteLibraryStore`.
//!
//! # Invariants
//! - Every read yields a fresh value; nothing is cached between calls.
//! - A missing key is `Ok(None)`, never an error.
//! - Enumeration order is ascending by key (card id, book title).

use crate::db::DbError;
use crate::model::book::Book;
use crate::model::card::{CardId, LibraryCard};
use thiserror::Error;

mod sqlite;

pub use sqlite::SqliteLibraryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure below the lending domain.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted lending data: {0}")]
    InvalidData(String),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Card collection keyed by card id.
pub trait CardStore {
    /// Inserts or overwrites the card stored under `card.id`.
    fn insert_card(&self, card: &LibraryCard) -> StoreResult<()>;
    fn get_card(&self, id: CardId) -> StoreResult<Option<LibraryCard>>;
    /// All cards, ascending by id.
    fn cards(&self) -> StoreResult<Vec<LibraryCard>>;
}

/// Book collection keyed by title.
pub trait BookStore {
    /// Inserts or overwrites the book stored under `book.title`.
    fn insert_book(&self, book: &Book) -> StoreResult<()>;
    fn get_book(&self, title: &str) -> StoreResult<Option<Book>>;
    /// All titles, ascending.
    fn book_titles(&self) -> StoreResult<Vec<String>>;
    /// All books, ascending by title.
    fn books(&self) -> StoreResult<Vec<Book>>;
}

/// Both collections plus the unit-of-work boundaries the services rely on.
pub trait LibraryStore: CardStore + BookStore {
    /// Hands out the next card id. Ids are never handed out twice, including
    /// across process restarts.
    fn next_card_id(&self) -> StoreResult<CardId>;

    /// Runs `op` as one serialized write unit.
    ///
    /// Writes made by `op` are persisted together when it returns `Ok` and
    /// discarded when it returns `Err`. While `op` runs no other writer can
    /// touch either collection. Nested calls join the outer unit.
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<StoreError>;

    /// Runs read-only `op` against one consistent view of both collections.
    fn snapshot<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<StoreError>;
}
