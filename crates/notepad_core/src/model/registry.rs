//! Record kind registry.
//!
//! # Responsibility
//! - Own the closed set of record kinds known to this process.
//! - Construct fresh records by kind name.
//!
//! # Invariants
//! - Kind names are unique; registration order is the presentation order.
//! - `create` never returns a record whose `kind()` differs from the request.

use crate::model::link::Link;
use crate::model::note::Note;
use crate::model::record::{Record, RecordKind, CREATED_AT_COLUMN, KIND_COLUMN};
use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};

type RecordFactory = fn() -> Box<dyn Record>;

/// Registration/lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownKind(String),
    DuplicateKind(&'static str),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(name) => write!(f, "unknown record kind: {name}"),
            Self::DuplicateKind(name) => write!(f, "record kind already registered: {name}"),
        }
    }
}

impl Error for RegistryError {}

struct KindEntry {
    name: &'static str,
    columns: Vec<&'static str>,
    factory: RecordFactory,
}

impl KindEntry {
    fn of<K: RecordKind>() -> Self {
        Self {
            name: K::KIND,
            columns: K::COLUMNS.iter().map(|column| column.name).collect(),
            factory: new_boxed::<K>,
        }
    }
}

/// Flat name-to-factory table, populated once at startup.
#[derive(Default)]
pub struct RecordRegistry {
    entries: Vec<KindEntry>,
}

impl RecordRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in kinds: Note, Task, Link.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                KindEntry::of::<Note>(),
                KindEntry::of::<Task>(),
                KindEntry::of::<Link>(),
            ],
        }
    }

    /// Registers kind `K` under `K::KIND`.
    pub fn register<K: RecordKind>(&mut self) -> Result<(), RegistryError> {
        if self.contains(K::KIND) {
            return Err(RegistryError::DuplicateKind(K::KIND));
        }
        self.entries.push(KindEntry::of::<K>());
        Ok(())
    }

    /// Registered kind names in registration order.
    pub fn kinds_available(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Creates a new, unsaved record of kind `name`, ignoring surrounding
    /// whitespace.
    pub fn create(&self, name: &str) -> Result<Box<dyn Record>, RegistryError> {
        let name = name.trim();
        self.entry(name)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| RegistryError::UnknownKind(name.to_string()))
    }

    /// Ordered union of every column written by registered kinds.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec![KIND_COLUMN, CREATED_AT_COLUMN];
        for &name in self.entries.iter().flat_map(|entry| entry.columns.iter()) {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
        columns
    }

    fn entry(&self, name: &str) -> Option<&KindEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

fn new_boxed<K: RecordKind>() -> Box<dyn Record> {
    Box::new(K::default())
}

#[cfg(test)]
mod tests {
    use super::{RecordRegistry, RegistryError};
    use crate::model::note::Note;

    #[test]
    fn standard_registry_lists_kinds_in_stable_order() {
        let registry = RecordRegistry::standard();
        assert_eq!(registry.kinds_available(), vec!["Note", "Task", "Link"]);
    }

    #[test]
    fn every_registered_kind_creates_matching_instance() {
        let registry = RecordRegistry::standard();
        for kind in registry.kinds_available() {
            let record = registry.create(kind).expect("registered kind");
            assert_eq!(record.kind(), kind);
            assert_eq!(record.id(), None);
        }
    }

    #[test]
    fn unregistered_names_fail_with_unknown_kind() {
        let registry = RecordRegistry::standard();
        for name in ["Reminder", "note", "", "Memo"] {
            let err = registry.create(name).unwrap_err();
            assert_eq!(err, RegistryError::UnknownKind(name.to_string()));
        }
    }

    #[test]
    fn create_trims_surrounding_whitespace() {
        let registry = RecordRegistry::standard();
        assert_eq!(registry.create("  Task ").unwrap().kind(), "Task");
    }

    #[test]
    fn contains_matches_names_exactly() {
        let registry = RecordRegistry::standard();
        assert!(registry.contains("Note"));
        assert!(!registry.contains(" Note"));
        assert!(!registry.contains("note"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = RecordRegistry::new();
        registry.register::<Note>().unwrap();
        assert_eq!(
            registry.register::<Note>(),
            Err(RegistryError::DuplicateKind("Note"))
        );
        assert_eq!(registry.kinds_available(), vec!["Note"]);
    }

    #[test]
    fn columns_are_the_ordered_union_of_kind_columns() {
        let registry = RecordRegistry::standard();
        assert_eq!(
            registry.columns(),
            vec!["type", "created_at", "text", "due_date", "url"]
        );
    }
}
