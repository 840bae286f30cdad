//! Row-store customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the lifecycle of one relational customer table (drop/create).
//! - Translate between `Customer` records and stored rows.
//!
//! # Invariants
//! - Identifiers are assigned by SQLite (`AUTOINCREMENT`) and never updated.
//! - Table names are validated identifiers; values are always bound parameters.
//! - `bulk_insert` runs inside one transaction, so a failing pair leaves no
//!   partial batch behind.

use crate::model::customer::{Customer, CustomerId, FullName};
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Table used when no explicit name is given.
pub const DEFAULT_CUSTOMER_TABLE: &str = "customers";

/// Repository interface for relational customer rows.
pub trait CustomerRowRepository {
    /// Drops the table if present and recreates it empty.
    fn reset_schema(&self) -> RepoResult<()>;
    /// Inserts every pair in one batch and returns the inserted row count.
    fn bulk_insert(&self, names: &[FullName]) -> RepoResult<usize>;
    /// Returns all rows whose first name equals `first_name` exactly.
    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Vec<Customer>>;
    /// Inserts one transient record and returns it with its assigned id.
    fn save(&self, customer: &Customer) -> RepoResult<Customer>;
    /// Returns every row ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Customer>>;
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Returns all rows whose last name equals `last_name`, ordered by id.
    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Customer>>;
}

impl<T: CustomerRowRepository + ?Sized> CustomerRowRepository for &T {
    fn reset_schema(&self) -> RepoResult<()> {
        (**self).reset_schema()
    }

    fn bulk_insert(&self, names: &[FullName]) -> RepoResult<usize> {
        (**self).bulk_insert(names)
    }

    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Vec<Customer>> {
        (**self).find_by_first_name(first_name)
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        (**self).save(customer)
    }

    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        (**self).find_by_id(id)
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Customer>> {
        (**self).find_by_last_name(last_name)
    }
}

/// SQL text issued against one customer table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CustomerStatements {
    drop_table: String,
    create_table: String,
    insert: String,
    select_by_first_name: String,
    select_all: String,
    select_by_id: String,
    select_by_last_name: String,
}

impl CustomerStatements {
    fn for_table(table: &str) -> Self {
        let select = format!("SELECT id, first_name, last_name FROM {table}");
        Self {
            drop_table: format!("DROP TABLE IF EXISTS {table}"),
            create_table: format!(
                "CREATE TABLE {table}(\
                 id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 first_name VARCHAR(255), \
                 last_name VARCHAR(255))"
            ),
            insert: format!("INSERT INTO {table}(first_name, last_name) VALUES (?,?)"),
            select_by_first_name: format!("{select} WHERE first_name = ?"),
            select_all: format!("{select} ORDER BY id"),
            select_by_id: format!("{select} WHERE id = ?"),
            select_by_last_name: format!("{select} WHERE last_name = ? ORDER BY id"),
        }
    }
}

/// SQLite-backed customer repository bound to a single table.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
    table: String,
    statements: CustomerStatements,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Binds the repository to the default `customers` table.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            table: DEFAULT_CUSTOMER_TABLE.to_string(),
            statements: CustomerStatements::for_table(DEFAULT_CUSTOMER_TABLE),
        }
    }

    /// Binds the repository to `table`.
    ///
    /// # Errors
    /// - `RepoError::InvalidTable` when `table` is not a plain SQL identifier.
    pub fn with_table(conn: &'conn Connection, table: &str) -> RepoResult<Self> {
        validate_table_name(table)?;
        Ok(Self {
            conn,
            table: table.to_string(),
            statements: CustomerStatements::for_table(table),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn query_customers(&self, sql: &str, value: &str) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let customers = stmt
            .query_map([value], customer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }
}

impl CustomerRowRepository for SqliteCustomerRepository<'_> {
    fn reset_schema(&self) -> RepoResult<()> {
        // Cached statements may still reference the dropped table.
        self.conn.flush_prepared_statement_cache();
        self.conn.execute(&self.statements.drop_table, [])?;
        self.conn.execute(&self.statements.create_table, [])?;
        info!(
            "event=schema_reset module=repo status=ok table={}",
            self.table
        );
        Ok(())
    }

    fn bulk_insert(&self, names: &[FullName]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(&self.statements.insert)?;
            for name in names {
                stmt.execute(params![name.first, name.last])?;
            }
        }
        tx.commit()?;

        info!(
            "event=bulk_insert module=repo status=ok table={} rows={}",
            self.table,
            names.len()
        );
        Ok(names.len())
    }

    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Vec<Customer>> {
        self.query_customers(&self.statements.select_by_first_name, first_name)
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        if let Some(id) = customer.id {
            return Err(RepoError::InvalidData(format!(
                "customer {id} is already persisted; rows are insert-only"
            )));
        }

        let mut stmt = self.conn.prepare_cached(&self.statements.insert)?;
        stmt.execute(params![customer.first_name, customer.last_name])?;
        let id = self.conn.last_insert_rowid();
        debug!(
            "event=customer_save module=repo status=ok table={} id={}",
            self.table, id
        );

        Ok(Customer::with_id(
            id,
            customer.first_name.as_str(),
            customer.last_name.as_str(),
        ))
    }

    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare_cached(&self.statements.select_all)?;
        let customers = stmt
            .query_map([], customer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self.conn.prepare_cached(&self.statements.select_by_id)?;
        let customer = stmt.query_row([id], customer_from_row).optional()?;
        Ok(customer)
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Customer>> {
        self.query_customers(&self.statements.select_by_last_name, last_name)
    }
}

/// Maps one `id, first_name, last_name` row to a `Customer`.
///
/// Columns are read by name, so column order in the select list is free.
pub fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer::with_id(
        row.get::<_, CustomerId>("id")?,
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
    ))
}

fn validate_table_name(name: &str) -> RepoResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let reserved = name.to_ascii_lowercase().starts_with("sqlite_");

    if valid_start && valid_rest && !reserved {
        Ok(())
    } else {
        Err(RepoError::InvalidTable(name.to_string()))
    }
}
