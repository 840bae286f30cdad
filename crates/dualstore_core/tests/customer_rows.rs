use dualstore_core::db::{open_db, open_db_in_memory};
use dualstore_core::{
    Customer, CustomerRowRepository, FullName, RepoError, SqliteCustomerRepository,
};
use std::collections::HashSet;

fn seed_names() -> Vec<FullName> {
    FullName::parse_all(["John Woo", "Jeff Dean", "Josh Bloch", "Josh Long"]).unwrap()
}

#[test]
fn bulk_insert_then_filter_by_first_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);

    repo.reset_schema().unwrap();
    assert_eq!(repo.bulk_insert(&seed_names()).unwrap(), 4);

    let matches = repo.find_by_first_name("Josh").unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|customer| customer.first_name == "Josh"));
    let last_names: HashSet<_> = matches.iter().map(|c| c.last_name.as_str()).collect();
    assert_eq!(last_names, HashSet::from(["Bloch", "Long"]));
}

#[test]
fn inserted_rows_get_unique_store_assigned_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);

    repo.reset_schema().unwrap();
    repo.bulk_insert(&seed_names()).unwrap();

    let all = repo.find_all().unwrap();
    let ids: HashSet<_> = all.iter().map(|customer| customer.id).collect();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(Option::is_some));
}

#[test]
fn filter_without_matches_returns_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);

    repo.reset_schema().unwrap();
    repo.bulk_insert(&seed_names()).unwrap();

    assert!(repo.find_by_first_name("josh").unwrap().is_empty());
    assert!(repo.find_by_first_name("Nobody").unwrap().is_empty());
}

#[test]
fn reset_schema_is_idempotent_and_empties_the_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);

    repo.reset_schema().unwrap();
    repo.bulk_insert(&seed_names()).unwrap();

    repo.reset_schema().unwrap();
    assert!(repo.find_all().unwrap().is_empty());

    repo.reset_schema().unwrap();
    assert!(repo.find_all().unwrap().is_empty());

    repo.bulk_insert(&seed_names()).unwrap();
    assert_eq!(repo.find_by_first_name("Josh").unwrap().len(), 2);
}

#[test]
fn reset_schema_restarts_identifiers() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);

    repo.reset_schema().unwrap();
    repo.bulk_insert(&seed_names()).unwrap();
    repo.reset_schema().unwrap();

    let saved = repo.save(&Customer::new("Jack", "Bauer")).unwrap();
    assert_eq!(saved.id, Some(1));
}

#[test]
fn queries_before_reset_surface_database_errors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);

    let err = repo.find_by_first_name("Josh").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn failed_batch_leaves_no_partial_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);
    repo.reset_schema().unwrap();

    conn.execute_batch(
        "CREATE TRIGGER reject_plato BEFORE INSERT ON customers
         WHEN NEW.first_name = 'Plato'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();

    let names = vec![
        FullName::new("John", "Woo"),
        FullName::new("Plato", "Athens"),
        FullName::new("Jeff", "Dean"),
    ];
    assert!(repo.bulk_insert(&names).is_err());
    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn save_assigns_id_and_find_by_id_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);
    repo.reset_schema().unwrap();

    let saved = repo.save(&Customer::new("Chloe", "O'Brian")).unwrap();
    let id = saved.id.unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.last_name, "O'Brian");

    assert!(repo.find_by_id(id + 100).unwrap().is_none());
}

#[test]
fn save_rejects_already_persisted_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);
    repo.reset_schema().unwrap();

    let saved = repo.save(&Customer::new("Kim", "Bauer")).unwrap();
    let err = repo.save(&saved).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn find_by_last_name_orders_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::new(&conn);
    repo.reset_schema().unwrap();

    let jack = repo.save(&Customer::new("Jack", "Bauer")).unwrap();
    repo.save(&Customer::new("David", "Palmer")).unwrap();
    let kim = repo.save(&Customer::new("Kim", "Bauer")).unwrap();

    assert_eq!(repo.find_by_last_name("Bauer").unwrap(), vec![jack, kim]);
}

#[test]
fn repositories_on_different_tables_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let customers = SqliteCustomerRepository::new(&conn);
    let directory = SqliteCustomerRepository::with_table(&conn, "customer_directory").unwrap();

    customers.reset_schema().unwrap();
    directory.reset_schema().unwrap();
    customers.bulk_insert(&seed_names()).unwrap();

    assert_eq!(customers.find_all().unwrap().len(), 4);
    assert!(directory.find_all().unwrap().is_empty());
    assert_eq!(directory.table(), "customer_directory");
}

#[test]
fn with_table_rejects_unsafe_identifiers() {
    let conn = open_db_in_memory().unwrap();
    let result = SqliteCustomerRepository::with_table(&conn, "customers; DROP TABLE documents");
    assert!(matches!(result, Err(RepoError::InvalidTable(_))));
}

#[test]
fn rows_persist_across_connections_for_file_databases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteCustomerRepository::new(&conn);
        repo.reset_schema().unwrap();
        repo.bulk_insert(&seed_names()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteCustomerRepository::new(&conn);
    assert_eq!(repo.find_by_first_name("Josh").unwrap().len(), 2);
}
