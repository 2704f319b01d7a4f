//! Maps parsed subcommands onto core services.
//!
//! Every command yields a JSON value; domain errors surface as `Err`.

use crate::cli::Command;
use anyhow::Result;
use lending_core::{core_version, CardRegistry, LendingEngine, LibraryQueries, LibraryStore};
use serde::Serialize;
use serde_json::{json, Value};

pub fn execute<S: LibraryStore + Copy>(store: S, command: Command) -> Result<Value> {
    let registry = CardRegistry::new(store);
    let engine = LendingEngine::new(store);
    let queries = LibraryQueries::new(store);

    let output = match command {
        Command::IssueCard { owner } => to_json(registry.issue_card(owner)?)?,
        Command::RevokeCard { card_id } => to_json(registry.revoke_card(card_id)?)?,
        Command::CreateBook { title } => to_json(engine.create_book(title)?)?,
        Command::IssueBook { card_id, title } => to_json(engine.issue_book(card_id, &title)?)?,
        Command::ReturnBook { card_id, title } => {
            to_json(engine.return_book(card_id, &title)?)?
        }
        Command::ListBooks => to_json(queries.list_books()?)?,
        Command::ListBorrowed { card_id } => to_json(queries.list_borrowed_books(card_id)?)?,
        Command::ListReturned { card_id } => to_json(queries.list_returned_books(card_id)?)?,
        Command::ListActiveCards => to_json(queries.list_active_cards()?)?,
        Command::ListInactiveCards => to_json(queries.list_inactive_cards()?)?,
        Command::ShowCard { card_id } => to_json(queries.get_card(card_id)?)?,
        Command::ShowBook { title } => to_json(queries.get_book(&title)?)?,
        Command::Version => json!({ "coreVersion": core_version() }),
    };
    Ok(output)
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
