//! Persistence gateway for records.
//!
//! # Responsibility
//! - Define the record persistence contract.
//! - Keep SQL details and row/record translation inside core.
//!
//! # Invariants
//! - Each operation acquires its own connection and releases it on every
//!   exit path.
//! - Rows are hydrated through the registry; unknown discriminators are
//!   surfaced as errors, never coerced.

pub mod post_repo;
