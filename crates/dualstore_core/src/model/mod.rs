//! Customer record types moved in and out of both stores.
//!
//! # Responsibility
//! - Define the relational `Customer` row shape and the `CustomerDocument`
//!   document shape.
//! - Provide `FullName`, the shared first/last pair used for seeding.
//!
//! # Invariants
//! - Identifiers are assigned by the store, never by callers.
//! - A persisted identifier is never changed afterwards.

pub mod customer;
pub mod document;
