//! SQLite implementation of the lending store.
//!
//! # Invariants
//! - A card row and its `card_books` rows are always written together.
//! - Borrow order is kept in `card_books.position`.
//! - Read paths reject undecodable rows instead of masking them.

use super::{BookStore, CardStore, LibraryStore, StoreError, StoreResult};
use crate::db::migrations::latest_version;
use crate::model::book::Book;
use crate::model::card::{CardId, LibraryCard, Owner};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::BTreeMap;

const CARD_SEQUENCE: &str = "cards";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("cards", &["id", "owner", "is_active"]),
    ("books", &["title", "is_borrowed"]),
    ("card_books", &["card_id", "position", "title"]),
    ("id_sequences", &["name", "next_value"]),
];

/// Lending store over a migrated SQLite connection.
///
/// Holds a shared borrow of the connection, so copies are cheap and all of
/// them observe the same transaction state.
#[derive(Debug, Clone, Copy)]
pub struct SqliteLibraryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLibraryStore<'conn> {
    /// Constructs a store from a connection returned by `open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn in_transaction<T, E, F>(&self, behavior: TransactionBehavior, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        if !self.conn.is_autocommit() {
            return op(self);
        }

        // Dropping `tx` without commit rolls back.
        let tx = Transaction::new_unchecked(self.conn, behavior).map_err(StoreError::from)?;
        let value = op(self)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }

    fn read_card(&self, db_id: i64) -> StoreResult<Option<LibraryCard>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, owner, is_active FROM cards WHERE id = ?1;",
                [db_id],
                CardRow::read,
            )
            .optional()?;

        match row {
            Some(row) => {
                let titles = self.load_card_titles(db_id)?;
                Ok(Some(row.into_card(titles)?))
            }
            None => Ok(None),
        }
    }

    fn read_all_cards(&self) -> StoreResult<Vec<LibraryCard>> {
        let mut titles_by_card: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT card_id, title FROM card_books
                 ORDER BY card_id ASC, position ASC;",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                titles_by_card
                    .entry(row.get("card_id")?)
                    .or_default()
                    .push(row.get("title")?);
            }
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, owner, is_active FROM cards ORDER BY id ASC;")?;
        let rows = stmt
            .query_map([], CardRow::read)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let titles = titles_by_card.remove(&row.id).unwrap_or_default();
                row.into_card(titles)
            })
            .collect()
    }

    fn load_card_titles(&self, card_id: i64) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT title FROM card_books
             WHERE card_id = ?1
             ORDER BY position ASC;",
        )?;
        let titles = stmt
            .query_map([card_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }
}

impl CardStore for SqliteLibraryStore<'_> {
    fn insert_card(&self, card: &LibraryCard) -> StoreResult<()> {
        let id = card_id_to_db(card.id)?;
        self.in_transaction(
            TransactionBehavior::Immediate,
            |store| -> StoreResult<()> {
                store.conn.execute(
                    "INSERT INTO cards (id, owner, is_active)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT (id) DO UPDATE SET
                        owner = excluded.owner,
                        is_active = excluded.is_active;",
                    params![id, card.owner.as_str(), card.is_active],
                )?;
                store
                    .conn
                    .execute("DELETE FROM card_books WHERE card_id = ?1;", [id])?;
                for (position, title) in card.books_borrowed.iter().enumerate() {
                    let position = i64::try_from(position).map_err(|_| {
                        StoreError::InvalidData(format!("borrow list of card {id} is too long"))
                    })?;
                    store.conn.execute(
                        "INSERT INTO card_books (card_id, position, title)
                         VALUES (?1, ?2, ?3);",
                        params![id, position, title],
                    )?;
                }
                Ok(())
            },
        )
    }

    fn get_card(&self, id: CardId) -> StoreResult<Option<LibraryCard>> {
        // Ids beyond the SQLite integer range can never have been stored.
        let Ok(db_id) = i64::try_from(id) else {
            return Ok(None);
        };

        // Card row and borrow list must come from the same commit.
        self.in_transaction(TransactionBehavior::Deferred, |store| store.read_card(db_id))
    }

    fn cards(&self) -> StoreResult<Vec<LibraryCard>> {
        self.in_transaction(TransactionBehavior::Deferred, Self::read_all_cards)
    }
}

impl BookStore for SqliteLibraryStore<'_> {
    fn insert_book(&self, book: &Book) -> StoreResult<()> {
        // Upsert keeps the row in place so `card_books` references stay valid.
        self.conn.execute(
            "INSERT INTO books (title, is_borrowed)
             VALUES (?1, ?2)
             ON CONFLICT (title) DO UPDATE SET is_borrowed = excluded.is_borrowed;",
            params![book.title.as_str(), book.is_borrowed],
        )?;
        Ok(())
    }

    fn get_book(&self, title: &str) -> StoreResult<Option<Book>> {
        let row = self
            .conn
            .query_row(
                "SELECT title, is_borrowed FROM books WHERE title = ?1;",
                [title],
                BookRow::read,
            )
            .optional()?;
        row.map(BookRow::into_book).transpose()
    }

    fn book_titles(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM books ORDER BY title ASC;")?;
        let titles = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    fn books(&self) -> StoreResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title, is_borrowed FROM books ORDER BY title ASC;")?;
        let rows = stmt
            .query_map([], BookRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(BookRow::into_book).collect()
    }
}

impl LibraryStore for SqliteLibraryStore<'_> {
    fn next_card_id(&self) -> StoreResult<CardId> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "UPDATE id_sequences
                 SET next_value = next_value + 1
                 WHERE name = ?1
                 RETURNING next_value - 1;",
                [CARD_SEQUENCE],
                |row| row.get(0),
            )
            .optional()?;

        let value = value.ok_or_else(|| {
            StoreError::InvalidData(format!("missing id sequence `{CARD_SEQUENCE}`"))
        })?;
        card_id_from_db(value)
    }

    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.in_transaction(TransactionBehavior::Immediate, op)
    }

    fn snapshot<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.in_transaction(TransactionBehavior::Deferred, op)
    }
}

struct CardRow {
    id: i64,
    owner: String,
    is_active: i64,
}

impl CardRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            owner: row.get("owner")?,
            is_active: row.get("is_active")?,
        })
    }

    fn into_card(self, books_borrowed: Vec<String>) -> StoreResult<LibraryCard> {
        Ok(LibraryCard {
            id: card_id_from_db(self.id)?,
            owner: Owner::new(self.owner),
            books_borrowed,
            is_active: parse_flag(self.is_active, "cards.is_active")?,
        })
    }
}

struct BookRow {
    title: String,
    is_borrowed: i64,
}

impl BookRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            title: row.get("title")?,
            is_borrowed: row.get("is_borrowed")?,
        })
    }

    fn into_book(self) -> StoreResult<Book> {
        Ok(Book {
            is_borrowed: parse_flag(self.is_borrowed, "books.is_borrowed")?,
            title: self.title,
        })
    }
}

fn card_id_to_db(id: CardId) -> StoreResult<i64> {
    i64::try_from(id)
        .map_err(|_| StoreError::InvalidData(format!("card id {id} exceeds storage range")))
}

fn card_id_from_db(value: i64) -> StoreResult<CardId> {
    CardId::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid card id `{value}` in cards.id")))
}

fn parse_flag(value: i64, column: &'static str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
