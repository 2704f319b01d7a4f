//! Domain errors returned by the lending services.
//!
//! Missing cards and books are ordinary results for the caller to handle.
//! Storage failures travel alongside them through `Store`.

use crate::model::card::CardId;
use crate::store::StoreError;
use thiserror::Error;

pub type LendingResult<T> = Result<T, LendingError>;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("library card does not exist: {0}")]
    CardDoesNotExist(CardId),
    #[error("book does not exist: `{0}`")]
    BookDoesNotExist(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LendingError {
    /// Stable short code used in log events and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CardDoesNotExist(_) => "card_does_not_exist",
            Self::BookDoesNotExist(_) => "book_does_not_exist",
            Self::Store(_) => "store_failure",
        }
    }
}
