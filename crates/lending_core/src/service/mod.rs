//! Lending use-case services.
//!
//! # Responsibility
//! - Card registry: issue and revoke membership cards.
//! - Lending engine: register books and move them between cards.
//! - Queries: read-only projections over both collections.
//!
//! # Invariants
//! - Every mutation runs inside `LibraryStore::atomically`.
//! - Lookups that fail short-circuit before any write.

pub mod card_service;
pub mod lending_service;
pub mod query_service;
