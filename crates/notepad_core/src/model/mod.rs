//! Polymorphic record model.
//!
//! # Responsibility
//! - Define the record contract and the static per-kind schema descriptor.
//! - Provide the built-in kinds and the registry that constructs them.
//!
//! # Invariants
//! - Every record kind is reachable only through an explicit registry entry.
//! - All kinds share one storage shape: `type`, `created_at` plus nullable
//!   kind-specific columns.

pub mod link;
pub mod note;
pub mod record;
pub mod registry;
pub mod task;
