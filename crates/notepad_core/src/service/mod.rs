//! Use-case services.
//!
//! # Responsibility
//! - Compose console input, the registry and the repository into the
//!   "new record" and "read records" use-cases.
//! - Keep the CLI decoupled from storage details.

pub mod post_service;
