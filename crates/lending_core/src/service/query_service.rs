//! Read-only projections over cards and books.
//!
//! # Invariants
//! - Queries never write.
//! - A missing card yields an empty result, not an error.

use crate::model::book::Book;
use crate::model::card::{CardId, LibraryCard};
use crate::store::{LibraryStore, StoreResult};

/// Listing and lookup entry points.
pub struct LibraryQueries<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> LibraryQueries<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_card(&self, id: CardId) -> StoreResult<Option<LibraryCard>> {
        self.store.get_card(id)
    }

    pub fn get_book(&self, title: &str) -> StoreResult<Option<Book>> {
        self.store.get_book(title)
    }

    /// All registered books in title order.
    pub fn list_books(&self) -> StoreResult<Vec<Book>> {
        self.store.books()
    }

    /// Titles currently checked out on card `card_id`, in borrow order.
    pub fn list_borrowed_books(&self, card_id: CardId) -> StoreResult<Vec<String>> {
        Ok(self
            .store
            .get_card(card_id)?
            .map(|card| card.books_borrowed)
            .unwrap_or_default())
    }

    /// Registered titles that card `card_id` is not currently holding.
    ///
    /// This is not a history of past returns: a title the card never
    /// borrowed is included too.
    pub fn list_returned_books(&self, card_id: CardId) -> StoreResult<Vec<String>> {
        self.store.snapshot(|store| -> StoreResult<Vec<String>> {
            let Some(card) = store.get_card(card_id)? else {
                return Ok(Vec::new());
            };
            let titles = store
                .book_titles()?
                .into_iter()
                .filter(|title| !card.holds(title))
                .collect();
            Ok(titles)
        })
    }

    pub fn list_active_cards(&self) -> StoreResult<Vec<LibraryCard>> {
        self.list_cards_where(|card| card.is_active)
    }

    /// Revoked cards, including any titles frozen on them.
    pub fn list_inactive_cards(&self) -> StoreResult<Vec<LibraryCard>> {
        self.list_cards_where(|card| !card.is_active)
    }

    fn list_cards_where(
        &self,
        keep: impl Fn(&LibraryCard) -> bool,
    ) -> StoreResult<Vec<LibraryCard>> {
        Ok(self
            .store
            .cards()?
            .into_iter()
            .filter(|card| keep(card))
            .collect())
    }
}
