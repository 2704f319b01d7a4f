//! Library card domain model.
//!
//! # Responsibility
//! - Define the membership record that permits borrowing.
//! - Own the borrow-list mutations so duplicate titles cannot appear.
//!
//! # Invariants
//! - `id` and `owner` are immutable after issue.
//! - `books_borrowed` keeps borrow order and holds each title at most once.
//! - `is_active` starts `true` and never reverts once cleared.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable card identifier minted from a persisted monotonic counter.
pub type CardId = u64;

/// Opaque identity of a card holder.
///
/// The core never interprets the value; it is stored and echoed back as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Owner {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Owner {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Membership record tracking which titles are checked out on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCard {
    pub id: CardId,
    pub owner: Owner,
    /// Titles currently checked out, in borrow order.
    pub books_borrowed: Vec<String>,
    pub is_active: bool,
}

impl LibraryCard {
    /// Creates a freshly issued card: active, nothing borrowed.
    pub fn issue(id: CardId, owner: Owner) -> Self {
        Self {
            id,
            owner,
            books_borrowed: Vec::new(),
            is_active: true,
        }
    }

    /// Marks the card inactive. Calling it again leaves the card unchanged.
    ///
    /// Borrowed titles stay on the card; revocation does not return them.
    pub fn revoke(&mut self) {
        self.is_active = false;
    }

    pub fn holds(&self, title: &str) -> bool {
        self.books_borrowed.iter().any(|held| held == title)
    }

    /// Appends `title` to the borrow list.
    ///
    /// Returns `false` without touching the list when the title is already
    /// held.
    pub fn record_borrow(&mut self, title: &str) -> bool {
        if self.holds(title) {
            return false;
        }
        self.books_borrowed.push(title.to_string());
        true
    }

    /// Removes every occurrence of `title` from the borrow list.
    ///
    /// Returns whether anything was removed.
    pub fn record_return(&mut self, title: &str) -> bool {
        let before = self.books_borrowed.len();
        self.books_borrowed.retain(|held| held != title);
        self.books_borrowed.len() != before
    }
}
