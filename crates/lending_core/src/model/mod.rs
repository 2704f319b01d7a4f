//! Domain model for library lending records.
//!
//! # Responsibility
//! - Define the two persisted records: membership cards and books.
//! - Keep lifecycle transitions (borrow, return, revoke) next to the data.
//!
//! # Invariants
//! - Cards and books are never deleted, only mutated in place.
//! - A card's borrow list mirrors the borrowed flags of the books it names.

pub mod book;
pub mod card;
