//! Customer data access over a row store and a document store.
//!
//! Both stores sit behind repository traits so the seed runner only sees
//! contracts; callers construct the implementations and pass them in.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::customer::{Customer, CustomerId, FullName, NameParseError};
pub use model::document::{CustomerDocument, DocumentId};
pub use repo::customer_repo::{
    customer_from_row, CustomerRowRepository, SqliteCustomerRepository, DEFAULT_CUSTOMER_TABLE,
};
pub use repo::document_repo::{
    CustomerDocumentRepository, InMemoryDocumentRepository, SqliteDocumentRepository,
    DEFAULT_COLLECTION,
};
pub use repo::{RepoError, RepoResult};
pub use service::seed_runner::{
    DirectoryReport, DocumentReport, RelationalReport, RunReport, SeedRunner, DIRECTORY_TABLE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
