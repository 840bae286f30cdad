use dualstore_core::db::{open_db, open_db_in_memory};
use dualstore_core::{
    CustomerDocument, CustomerDocumentRepository, InMemoryDocumentRepository, RepoError,
    SqliteDocumentRepository,
};
use std::collections::HashSet;

// Each contract check runs against both document backends.
fn check_contract(repo: &dyn CustomerDocumentRepository) {
    delete_all_empties_collection(repo);
    save_assigns_distinct_ids_and_find_all_returns_both(repo);
    single_result_lookup_semantics(repo);
    save_with_existing_id_upserts(repo);
    round_trip_by_id(repo);
}

fn delete_all_empties_collection(repo: &dyn CustomerDocumentRepository) {
    repo.save(&CustomerDocument::new("Stale", "Entry")).unwrap();
    assert!(repo.delete_all().unwrap() >= 1);
    assert!(repo.find_all().unwrap().is_empty());
    assert_eq!(repo.count().unwrap(), 0);
    assert_eq!(repo.delete_all().unwrap(), 0);
}

fn save_assigns_distinct_ids_and_find_all_returns_both(repo: &dyn CustomerDocumentRepository) {
    repo.delete_all().unwrap();
    let alice = repo.save(&CustomerDocument::new("Alice", "Smith")).unwrap();
    let bob = repo.save(&CustomerDocument::new("Bob", "Smith")).unwrap();

    let alice_id = alice.id.clone().unwrap();
    let bob_id = bob.id.clone().unwrap();
    assert!(!alice_id.is_empty());
    assert!(!bob_id.is_empty());
    assert_ne!(alice_id, bob_id);

    let all = repo.find_all().unwrap();
    assert_eq!(all, vec![alice.clone(), bob.clone()]);

    let smiths = repo.find_by_last_name("Smith").unwrap();
    let smith_ids: HashSet<_> = smiths.iter().filter_map(|d| d.id.clone()).collect();
    assert_eq!(smith_ids, HashSet::from([alice_id, bob_id]));
    assert!(repo.find_by_last_name("Jones").unwrap().is_empty());
}

fn single_result_lookup_semantics(repo: &dyn CustomerDocumentRepository) {
    repo.delete_all().unwrap();
    let alice = repo.save(&CustomerDocument::new("Alice", "Smith")).unwrap();
    repo.save(&CustomerDocument::new("Bob", "Smith")).unwrap();

    assert_eq!(repo.find_by_first_name("Alice").unwrap(), Some(alice));
    assert_eq!(repo.find_by_first_name("NoSuchName").unwrap(), None);
    assert_eq!(repo.find_by_first_name("alice").unwrap(), None);

    repo.save(&CustomerDocument::new("Bob", "Jones")).unwrap();
    let err = repo.find_by_first_name("Bob").unwrap_err();
    assert!(matches!(err, RepoError::NonUniqueResult { .. }));
}

fn save_with_existing_id_upserts(repo: &dyn CustomerDocumentRepository) {
    repo.delete_all().unwrap();
    let alice = repo.save(&CustomerDocument::new("Alice", "Smith")).unwrap();
    let bob = repo.save(&CustomerDocument::new("Bob", "Smith")).unwrap();

    let mut renamed = alice.clone();
    renamed.last_name = "Jones".to_string();
    let stored = repo.save(&renamed).unwrap();
    assert_eq!(stored, renamed);

    assert_eq!(repo.count().unwrap(), 2);
    assert_eq!(repo.find_all().unwrap(), vec![renamed, bob]);
}

fn round_trip_by_id(repo: &dyn CustomerDocumentRepository) {
    repo.delete_all().unwrap();
    let saved = repo.save(&CustomerDocument::new("Alice", "Smith")).unwrap();
    let id = saved.id.clone().unwrap();

    assert_eq!(repo.find_by_id(&id).unwrap(), Some(saved));
    assert_eq!(repo.find_by_id("missing").unwrap(), None);
}

#[test]
fn sqlite_repository_satisfies_contract() {
    let conn = open_db_in_memory().unwrap();
    check_contract(&SqliteDocumentRepository::new(&conn));
}

#[test]
fn in_memory_repository_satisfies_contract() {
    check_contract(&InMemoryDocumentRepository::new());
}

#[test]
fn sqlite_collections_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let customers = SqliteDocumentRepository::new(&conn);
    let archive = SqliteDocumentRepository::with_collection(&conn, "archive");

    customers.save(&CustomerDocument::new("Alice", "Smith")).unwrap();
    archive.save(&CustomerDocument::new("Bob", "Smith")).unwrap();

    assert_eq!(customers.delete_all().unwrap(), 1);
    assert_eq!(archive.count().unwrap(), 1);
    assert_eq!(archive.collection(), "archive");
}

#[test]
fn sqlite_documents_are_stored_as_camel_case_json() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::new(&conn);
    let saved = repo.save(&CustomerDocument::new("Alice", "Smith")).unwrap();

    let (first, last): (String, String) = conn
        .query_row(
            "SELECT json_extract(body, '$.firstName'), json_extract(body, '$.lastName')
             FROM documents WHERE id = ?1;",
            [saved.id.unwrap()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(first, "Alice");
    assert_eq!(last, "Smith");
}

#[test]
fn sqlite_rejects_corrupted_document_bodies() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::new(&conn);
    conn.execute(
        "INSERT INTO documents (collection, id, body)
         VALUES ('customer', 'abc', '{\"id\":\"other\",\"firstName\":\"A\",\"lastName\":\"B\"}');",
        [],
    )
    .unwrap();

    let err = repo.find_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn sqlite_documents_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("documents.db");

    let saved = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteDocumentRepository::new(&conn);
        repo.save(&CustomerDocument::new("Alice", "Smith")).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteDocumentRepository::new(&conn);
    assert_eq!(repo.find_by_first_name("Alice").unwrap(), Some(saved));
}
