//! Record use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::console::{choose_kind, Console};
use crate::model::record::{Record, RecordError, RecordId};
use crate::repo::post_repo::{ListQuery, PostRepository, StoreError, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error for use-cases that mix console input with persistence.
#[derive(Debug)]
pub enum ServiceError {
    Input(RecordError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RecordError> for ServiceError {
    fn from(value: RecordError) -> Self {
        Self::Input(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service wrapper over a post repository.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Kind names in presentation order.
    pub fn kinds_available(&self) -> Vec<&'static str> {
        self.repo.registry().kinds_available()
    }

    /// Asks for a kind, then lets the chosen record read itself.
    ///
    /// The returned record is not stored yet.
    pub fn compose(&self, console: &mut Console<'_>) -> ServiceResult<Box<dyn Record>> {
        let mut record = choose_kind(console, self.repo.registry())?;
        record.read_from_console(console)?;
        Ok(record)
    }

    /// Composes a record at the console and stores it.
    pub fn create_from_console(
        &self,
        console: &mut Console<'_>,
    ) -> ServiceResult<Box<dyn Record>> {
        let mut record = self.compose(console)?;
        self.repo.insert(&mut *record)?;
        Ok(record)
    }

    pub fn save(&self, record: &mut dyn Record) -> StoreResult<RecordId> {
        self.repo.insert(record)
    }

    pub fn find(&self, id: RecordId) -> StoreResult<Box<dyn Record>> {
        self.repo.find_by_id(id)
    }

    pub fn list(&self, query: &ListQuery) -> StoreResult<Vec<Box<dyn Record>>> {
        self.repo.list(query)
    }
}
