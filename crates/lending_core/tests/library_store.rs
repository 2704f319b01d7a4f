use lending_core::db::migrations::latest_version;
use lending_core::db::{open_db, open_db_in_memory};
use lending_core::{
    Book, BookStore, CardStore, LibraryCard, LibraryStore, Owner, SqliteLibraryStore, StoreError,
};
use rusqlite::Connection;

fn card_with(id: u64, titles: &[&str]) -> LibraryCard {
    let mut card = LibraryCard::issue(id, Owner::new(format!("owner-{id}")));
    for title in titles {
        card.record_borrow(title);
    }
    card
}

#[test]
fn card_insert_and_get_roundtrip_keeps_borrow_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    for title in ["Emma", "Dune", "Beloved"] {
        store.insert_book(&Book::new(title)).unwrap();
    }
    let card = card_with(5, &["Emma", "Dune", "Beloved"]);
    store.insert_card(&card).unwrap();

    let loaded = store.get_card(5).unwrap().unwrap();
    assert_eq!(loaded, card);
    assert_eq!(loaded.books_borrowed, vec!["Emma", "Dune", "Beloved"]);
}

#[test]
fn card_insert_overwrites_existing_entry() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();
    store.insert_book(&Book::new("Dune")).unwrap();
    store.insert_book(&Book::new("Emma")).unwrap();

    store.insert_card(&card_with(1, &["Dune", "Emma"])).unwrap();
    let mut updated = card_with(1, &["Emma"]);
    updated.revoke();
    store.insert_card(&updated).unwrap();

    let loaded = store.get_card(1).unwrap().unwrap();
    assert_eq!(loaded.books_borrowed, vec!["Emma"]);
    assert!(!loaded.is_active);
    assert_eq!(store.cards().unwrap().len(), 1);
}

#[test]
fn missing_keys_return_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    assert!(store.get_card(999).unwrap().is_none());
    assert!(store.get_card(u64::MAX).unwrap().is_none());
    assert!(store.get_book("Dune").unwrap().is_none());
}

#[test]
fn enumeration_is_ordered_by_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    for title in ["Zorba", "Dune", "Emma", "Beloved"] {
        store.insert_book(&Book::new(title)).unwrap();
    }
    for id in [30, 10, 20] {
        store.insert_card(&card_with(id, &[])).unwrap();
    }

    assert_eq!(
        store.book_titles().unwrap(),
        vec!["Beloved", "Dune", "Emma", "Zorba"]
    );
    let books: Vec<String> = store
        .books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(books, vec!["Beloved", "Dune", "Emma", "Zorba"]);
    let ids: Vec<u64> = store.cards().unwrap().iter().map(|card| card.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn cards_enumeration_attaches_each_borrow_list() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();
    for title in ["Dune", "Emma", "Zorba"] {
        store.insert_book(&Book::new(title)).unwrap();
    }
    store.insert_card(&card_with(1, &["Zorba", "Dune"])).unwrap();
    store.insert_card(&card_with(2, &[])).unwrap();
    store.insert_card(&card_with(3, &["Emma"])).unwrap();

    let cards = store.cards().unwrap();
    assert_eq!(cards[0].books_borrowed, vec!["Zorba", "Dune"]);
    assert!(cards[1].books_borrowed.is_empty());
    assert_eq!(cards[2].books_borrowed, vec!["Emma"]);
}

#[test]
fn book_insert_overwrites_flag_in_place() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    store
        .insert_book(&Book {
            title: "Dune".to_string(),
            is_borrowed: true,
        })
        .unwrap();
    store.insert_card(&card_with(1, &["Dune"])).unwrap();
    store.insert_book(&Book::new("Dune")).unwrap();

    assert!(!store.get_book("Dune").unwrap().unwrap().is_borrowed);
    assert_eq!(store.books().unwrap().len(), 1);
    assert_eq!(
        store.get_card(1).unwrap().unwrap().books_borrowed,
        vec!["Dune"]
    );
}

#[test]
fn card_referencing_unknown_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    let err = store.insert_card(&card_with(1, &["Ghost"])).unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
    assert!(store.get_card(1).unwrap().is_none());
}

#[test]
fn duplicate_title_on_one_card_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();
    store.insert_book(&Book::new("Dune")).unwrap();

    let mut card = card_with(1, &[]);
    card.books_borrowed = vec!["Dune".to_string(), "Dune".to_string()];
    assert!(store.insert_card(&card).is_err());
    assert!(store.get_card(1).unwrap().is_none());
}

#[test]
fn next_card_id_is_monotonic_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lending.sqlite3");

    let first_batch: Vec<u64> = {
        let conn = open_db(&path).unwrap();
        let store = SqliteLibraryStore::try_new(&conn).unwrap();
        (0..3).map(|_| store.next_card_id().unwrap()).collect()
    };
    assert_eq!(first_batch, vec![1, 2, 3]);

    let conn = open_db(&path).unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();
    assert_eq!(store.next_card_id().unwrap(), 4);
}

#[test]
fn atomically_discards_all_writes_on_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    let result = store.atomically(|store| -> Result<(), StoreError> {
        store.insert_book(&Book::new("Dune"))?;
        store.insert_card(&card_with(1, &["Dune"]))?;
        Err(StoreError::InvalidData("abort".to_string()))
    });

    assert!(result.is_err());
    assert!(store.get_book("Dune").unwrap().is_none());
    assert!(store.get_card(1).unwrap().is_none());
}

#[test]
fn atomically_persists_all_writes_on_success() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();

    let id = store
        .atomically(|store| -> Result<u64, StoreError> {
            let id = store.next_card_id()?;
            store.insert_book(&Book::new("Dune"))?;
            store.insert_card(&card_with(id, &["Dune"]))?;
            Ok(id)
        })
        .unwrap();

    assert!(conn.is_autocommit());
    assert_eq!(
        store.get_card(id).unwrap().unwrap().books_borrowed,
        vec!["Dune"]
    );
}

#[test]
fn corrupted_flag_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLibraryStore::try_new(&conn).unwrap();
    store.insert_book(&Book::new("Dune")).unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute("UPDATE books SET is_borrowed = 7 WHERE title = 'Dune';", [])
        .unwrap();

    let err = store.get_book("Dune").unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidData(message) if message.contains("books.is_borrowed")
    ));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteLibraryStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteLibraryStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("cards"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE cards (
            id INTEGER PRIMARY KEY NOT NULL,
            owner TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteLibraryStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "cards",
            column: "is_active"
        })
    ));
}
