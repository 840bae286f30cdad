//! Repository contracts and their store-specific implementations.
//!
//! # Responsibility
//! - Expose one repository contract per store shape: rows (`customer_repo`)
//!   and documents (`document_repo`).
//! - Keep SQL text and JSON paths out of the seed runner.
//!
//! # Invariants
//! - Store failures propagate to the caller unchanged; nothing here retries.
//! - "No match" on single-result lookups is `Ok(None)`, never an error.

pub mod customer_repo;
pub mod document_repo;
mod error;

pub use error::{RepoError, RepoResult};
