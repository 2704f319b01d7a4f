//! Book registration and the borrow/return state machine.
//!
//! # Invariants
//! - A book moves `Available -> Borrowed` only through `issue_book` on an
//!   active card, and back only through `return_book` on an active card.
//! - When a guard fails the call succeeds without writing and returns the
//!   book as currently stored.
//! - Book flag and card borrow list are persisted in the same unit of work.

use crate::error::{LendingError, LendingResult};
use crate::model::book::Book;
use crate::model::card::{CardId, LibraryCard};
use crate::store::{LibraryStore, StoreResult};
use log::{info, warn};

/// Registers books and moves them between the shelf and library cards.
pub struct LendingEngine<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> LendingEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers `title` as an available book.
    ///
    /// An existing record with the same title is overwritten, which resets a
    /// borrowed flag without touching any card's borrow list.
    pub fn create_book(&self, title: impl Into<String>) -> StoreResult<Book> {
        let book = Book::new(title);
        self.store.atomically(|store| store.insert_book(&book))?;

        info!(
            "event=book_create module=lending status=ok title_len={}",
            book.title.len()
        );
        Ok(book)
    }

    /// Checks `title` out on card `card_id`.
    ///
    /// Returns the book unchanged when it is already borrowed or the card is
    /// inactive.
    ///
    /// # Errors
    /// - `CardDoesNotExist` is checked first, then `BookDoesNotExist`.
    pub fn issue_book(&self, card_id: CardId, title: &str) -> LendingResult<Book> {
        let result = self.store.atomically(|store| -> LendingResult<Transition> {
            let (mut card, mut book) = resolve_loan(store, card_id, title)?;
            if book.is_borrowed || !card.is_active {
                return Ok(Transition::skipped(book));
            }

            book.is_borrowed = true;
            card.record_borrow(title);
            store.insert_book(&book)?;
            store.insert_card(&card)?;
            Ok(Transition::written(book))
        });

        log_transition("book_issue", card_id, title, &result);
        result.map(|transition| transition.book)
    }

    /// Checks `title` back in through card `card_id`.
    ///
    /// Only the book's flag and this card's list are updated. Returns the
    /// book unchanged when it is not borrowed or the card is inactive.
    ///
    /// # Errors
    /// - Same resolution order as [`LendingEngine::issue_book`].
    pub fn return_book(&self, card_id: CardId, title: &str) -> LendingResult<Book> {
        let result = self.store.atomically(|store| -> LendingResult<Transition> {
            let (mut card, mut book) = resolve_loan(store, card_id, title)?;
            if !book.is_borrowed || !card.is_active {
                return Ok(Transition::skipped(book));
            }

            book.is_borrowed = false;
            card.record_return(title);
            store.insert_book(&book)?;
            store.insert_card(&card)?;
            Ok(Transition::written(book))
        });

        log_transition("book_return", card_id, title, &result);
        result.map(|transition| transition.book)
    }
}

struct Transition {
    book: Book,
    applied: bool,
}

impl Transition {
    fn written(book: Book) -> Self {
        Self {
            book,
            applied: true,
        }
    }

    fn skipped(book: Book) -> Self {
        Self {
            book,
            applied: false,
        }
    }
}

fn resolve_loan<S: LibraryStore>(
    store: &S,
    card_id: CardId,
    title: &str,
) -> LendingResult<(LibraryCard, Book)> {
    let card = store
        .get_card(card_id)?
        .ok_or(LendingError::CardDoesNotExist(card_id))?;
    let book = store
        .get_book(title)?
        .ok_or_else(|| LendingError::BookDoesNotExist(title.to_string()))?;
    Ok((card, book))
}

fn log_transition(
    event: &str,
    card_id: CardId,
    title: &str,
    result: &LendingResult<Transition>,
) {
    match result {
        Ok(transition) => info!(
            "event={event} module=lending status=ok card_id={card_id} title_len={} applied={}",
            title.len(),
            transition.applied
        ),
        Err(err) => warn!(
            "event={event} module=lending status=error card_id={card_id} title_len={} error_code={}",
            title.len(),
            err.code()
        ),
    }
}
