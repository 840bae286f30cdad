//! Use-case orchestration over the repository contracts.
//!
//! # Responsibility
//! - Drive repositories through the fixed reset/seed/query sequence.
//! - Stay storage-agnostic: only trait contracts are visible here.

pub mod seed_runner;
