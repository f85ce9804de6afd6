//! Core domain logic for notepad.
//! Polymorphic records (notes, tasks, links) persisted in one SQLite table.

pub mod config;
pub mod console;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{StoreConfig, DEFAULT_DB_FILE};
pub use console::{choose_kind, Console};
pub use export::{export_file_name, export_to_file};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::link::Link;
pub use model::note::Note;
pub use model::record::{FieldValue, Record, RecordError, RecordId, RecordKind, StorageRow};
pub use model::registry::{RecordRegistry, RegistryError};
pub use model::task::Task;
pub use repo::post_repo::{
    ListQuery, PostRepository, SqlitePostRepository, StoreError, StoreResult,
};
pub use service::post_service::{PostService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
