//! Book catalog record.
//!
//! # Invariants
//! - `title` is the storage key; there is one record per title, not per copy.
//! - `is_borrowed` starts `false`.

use serde::{Deserialize, Serialize};

/// Catalog entry keyed by title with a single borrowed/available flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique key of the record.
    pub title: String,
    /// Whether some card currently holds this title.
    pub is_borrowed: bool,
}

impl Book {
    /// Creates an available book.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_borrowed: false,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.is_borrowed
    }
}
