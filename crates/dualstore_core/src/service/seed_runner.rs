//! One-shot seed-and-query runner.
//!
//! # Responsibility
//! - Reset each store, insert the fixed seed set, and run the fixed lookups.
//! - Log every observed record and hand the same records back as reports.
//!
//! # Invariants
//! - Steps run strictly in order; each completes (including its log lines)
//!   before the next starts.
//! - The first failing step aborts the run; nothing after it executes.
//! - Absence on single-result lookups is logged and reported, not raised.

use crate::model::customer::{Customer, CustomerId, FullName};
use crate::model::document::CustomerDocument;
use crate::repo::customer_repo::CustomerRowRepository;
use crate::repo::document_repo::CustomerDocumentRepository;
use crate::repo::RepoResult;
use log::info;

/// Names bulk-inserted by the relational step.
pub const SEED_NAMES: [&str; 4] = ["John Woo", "Jeff Dean", "Josh Bloch", "Josh Long"];
/// First name queried after the bulk insert.
pub const SEED_FIRST_NAME_FILTER: &str = "Josh";

/// Table the bootstrap binds the directory repository to.
pub const DIRECTORY_TABLE: &str = "customer_directory";
/// Customers saved one by one by the directory step.
pub const DIRECTORY_CUSTOMERS: [(&str, &str); 5] = [
    ("Jack", "Bauer"),
    ("Chloe", "O'Brian"),
    ("Kim", "Bauer"),
    ("David", "Palmer"),
    ("Michelle", "Dessler"),
];
pub const DIRECTORY_LOOKUP_ID: CustomerId = 1;
pub const DIRECTORY_LAST_NAME_FILTER: &str = "Bauer";

/// Documents saved by the document step.
pub const DOCUMENT_CUSTOMERS: [(&str, &str); 2] = [("Alice", "Smith"), ("Bob", "Smith")];
pub const DOCUMENT_FIRST_NAME_FILTER: &str = "Alice";
pub const DOCUMENT_LAST_NAME_FILTER: &str = "Smith";

const RULE: &str = "-------------------------------";

/// Records observed by the relational step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalReport {
    pub inserted: usize,
    pub matches: Vec<Customer>,
}

/// Records observed by the directory step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryReport {
    pub saved: Vec<Customer>,
    pub all: Vec<Customer>,
    pub by_id: Option<Customer>,
    pub by_last_name: Vec<Customer>,
}

/// Records observed by the document step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub removed: usize,
    pub saved: Vec<CustomerDocument>,
    pub all: Vec<CustomerDocument>,
    pub by_first_name: Option<CustomerDocument>,
    pub by_last_name: Vec<CustomerDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub relational: RelationalReport,
    pub directory: DirectoryReport,
    pub documents: DocumentReport,
}

/// Runs the fixed demonstration sequence over injected repositories.
///
/// `customers` and `directory` are expected to be bound to different tables;
/// each step resets its own store before seeding it.
pub struct SeedRunner<R, D>
where
    R: CustomerRowRepository,
    D: CustomerDocumentRepository,
{
    customers: R,
    directory: R,
    documents: D,
}

impl<R, D> SeedRunner<R, D>
where
    R: CustomerRowRepository,
    D: CustomerDocumentRepository,
{
    pub fn new(customers: R, directory: R, documents: D) -> Self {
        Self {
            customers,
            directory,
            documents,
        }
    }

    /// Runs every step in order, stopping at the first error.
    pub fn run(&self) -> RepoResult<RunReport> {
        let relational = self.run_relational()?;
        let directory = self.run_directory()?;
        let documents = self.run_documents()?;
        Ok(RunReport {
            relational,
            directory,
            documents,
        })
    }

    /// Reset, bulk insert `SEED_NAMES`, then query by `SEED_FIRST_NAME_FILTER`.
    pub fn run_relational(&self) -> RepoResult<RelationalReport> {
        info!("Creating tables");
        self.customers.reset_schema()?;

        let names = FullName::parse_all(SEED_NAMES)?;
        for name in &names {
            info!(
                "Inserting customer record for {} {}",
                name.first, name.last
            );
        }
        let inserted = self.customers.bulk_insert(&names)?;

        info!(
            "Querying for customer records where first_name = '{}':",
            SEED_FIRST_NAME_FILTER
        );
        let matches = self.customers.find_by_first_name(SEED_FIRST_NAME_FILTER)?;
        log_all(&matches);

        Ok(RelationalReport { inserted, matches })
    }

    /// Reset, save `DIRECTORY_CUSTOMERS` one by one, then list and look up.
    pub fn run_directory(&self) -> RepoResult<DirectoryReport> {
        self.directory.reset_schema()?;

        let saved = DIRECTORY_CUSTOMERS
            .iter()
            .map(|(first, last)| self.directory.save(&Customer::new(*first, *last)))
            .collect::<RepoResult<Vec<_>>>()?;

        info!("Customers found with findAll():");
        info!("{RULE}");
        let all = self.directory.find_all()?;
        log_all(&all);
        info!("");

        info!("Customer found with findById({DIRECTORY_LOOKUP_ID}):");
        info!("{RULE}");
        let by_id = self.directory.find_by_id(DIRECTORY_LOOKUP_ID)?;
        log_optional(by_id.as_ref());
        info!("");

        info!("Customer found with findByLastName('{DIRECTORY_LAST_NAME_FILTER}'):");
        info!("{RULE}");
        let by_last_name = self
            .directory
            .find_by_last_name(DIRECTORY_LAST_NAME_FILTER)?;
        log_all(&by_last_name);
        info!("");

        Ok(DirectoryReport {
            saved,
            all,
            by_id,
            by_last_name,
        })
    }

    /// Clear the collection, save `DOCUMENT_CUSTOMERS`, then list and look up.
    pub fn run_documents(&self) -> RepoResult<DocumentReport> {
        let removed = self.documents.delete_all()?;

        let saved = DOCUMENT_CUSTOMERS
            .iter()
            .map(|(first, last)| self.documents.save(&CustomerDocument::new(*first, *last)))
            .collect::<RepoResult<Vec<_>>>()?;

        info!("Customers found with findAll():");
        info!("{RULE}");
        let all = self.documents.find_all()?;
        log_all(&all);
        info!("");

        info!("Customer found with findByFirstName('{DOCUMENT_FIRST_NAME_FILTER}'):");
        info!("{RULE}");
        let by_first_name = self
            .documents
            .find_by_first_name(DOCUMENT_FIRST_NAME_FILTER)?;
        log_optional(by_first_name.as_ref());

        info!("Customers found with findByLastName('{DOCUMENT_LAST_NAME_FILTER}'):");
        info!("{RULE}");
        let by_last_name = self
            .documents
            .find_by_last_name(DOCUMENT_LAST_NAME_FILTER)?;
        log_all(&by_last_name);

        Ok(DocumentReport {
            removed,
            saved,
            all,
            by_first_name,
            by_last_name,
        })
    }
}

fn log_all<T: std::fmt::Display>(records: &[T]) {
    for record in records {
        info!("{record}");
    }
}

fn log_optional<T: std::fmt::Display>(record: Option<&T>) {
    match record {
        Some(record) => info!("{record}"),
        None => info!("(none)"),
    }
}
