//! Card registry use-cases.
//!
//! # Invariants
//! - Issued ids come from the store's monotonic sequence, never a clock.
//! - Revocation is one-way and does not return borrowed books.

use crate::error::{LendingError, LendingResult};
use crate::model::card::{CardId, LibraryCard, Owner};
use crate::store::{LibraryStore, StoreResult};
use log::{info, warn};

/// Issues and revokes library cards.
pub struct CardRegistry<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> CardRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issues an active card with an empty borrow list for `owner`.
    pub fn issue_card(&self, owner: impl Into<Owner>) -> StoreResult<LibraryCard> {
        let owner = owner.into();
        let card = self.store.atomically(|store| -> StoreResult<LibraryCard> {
            let card = LibraryCard::issue(store.next_card_id()?, owner);
            store.insert_card(&card)?;
            Ok(card)
        })?;

        info!(
            "event=card_issue module=card_registry status=ok card_id={}",
            card.id
        );
        Ok(card)
    }

    /// Marks card `id` inactive and returns it.
    ///
    /// Revoking an already revoked card succeeds and returns it unchanged.
    ///
    /// # Errors
    /// - `CardDoesNotExist(id)` when no card has this id.
    pub fn revoke_card(&self, id: CardId) -> LendingResult<LibraryCard> {
        let result = self.store.atomically(|store| -> LendingResult<LibraryCard> {
            let mut card = store
                .get_card(id)?
                .ok_or(LendingError::CardDoesNotExist(id))?;
            if card.is_active {
                card.revoke();
                store.insert_card(&card)?;
            }
            Ok(card)
        });

        match &result {
            Ok(card) => info!(
                "event=card_revoke module=card_registry status=ok card_id={id} books_held={}",
                card.books_borrowed.len()
            ),
            Err(err) => warn!(
                "event=card_revoke module=card_registry status=error card_id={id} error_code={}",
                err.code()
            ),
        }
        result
    }
}
