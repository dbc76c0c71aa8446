//! # Repository
//!
//! The injected backend seam the surrounding provisioning tool plugs its
//! drivers into. Domain records (websites, databases, source repositories)
//! live behind the [`Repository`] trait; [`MemoryRepository`] is the
//! in-memory implementation used in tests and simulations, and publishes
//! every mutation through the observer fabric as a [`RepositoryEvent`].

use std::cell::RefCell;
use std::fmt;

use thiserror::Error;

use crate::observer::Subject;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A record with the same identity already exists
    #[error("record already exists: {id}")]
    Duplicate { id: String },

    /// No record with the given identity
    #[error("record not found: {id}")]
    NotFound { id: String },
}

impl RepositoryError {
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::Duplicate { id: id.into() }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// A storable domain record with a stable identity.
pub trait Record: Clone {
    fn id(&self) -> &str;
}

/// Lifecycle event published on every successful mutation.
#[derive(Debug, Clone)]
pub enum RepositoryEvent<R> {
    Added(R),
    Updated(R),
    Removed(R),
}

/// Backend seam: lookup and mutation of one record kind.
pub trait Repository<R: Record> {
    /// Returns the record with the given identity, if any.
    fn get(&self, id: &str) -> Option<R>;

    /// Returns every record the predicate accepts, in storage order.
    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> Vec<R>;

    /// Stores a new record; rejects a duplicate identity.
    fn add(&self, record: R) -> RepositoryResult<()>;

    /// Replaces the record with the same identity.
    fn update(&self, record: R) -> RepositoryResult<()>;

    /// Removes and returns the record with the given identity.
    fn delete(&self, id: &str) -> RepositoryResult<R>;
}

/// In-memory record store.
pub struct MemoryRepository<R: Record> {
    records: RefCell<Vec<R>>,
    events: Subject<RepositoryEvent<R>>,
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            events: Subject::new(),
        }
    }

    /// Seeds the store, keeping the given order.
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RefCell::new(records),
            events: Subject::new(),
        }
    }

    /// The store's event channel.
    pub fn events(&self) -> &Subject<RepositoryEvent<R>> {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.borrow().iter().position(|r| r.id() == id)
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Repository<R> for MemoryRepository<R> {
    fn get(&self, id: &str) -> Option<R> {
        self.records.borrow().iter().find(|r| r.id() == id).cloned()
    }

    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> Vec<R> {
        self.records
            .borrow()
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    fn add(&self, record: R) -> RepositoryResult<()> {
        if self.position(record.id()).is_some() {
            return Err(RepositoryError::duplicate(record.id()));
        }
        self.records.borrow_mut().push(record.clone());
        tracing::debug!(id = %record.id(), "record added");
        self.events.notify(&RepositoryEvent::Added(record));
        Ok(())
    }

    fn update(&self, record: R) -> RepositoryResult<()> {
        let index = self
            .position(record.id())
            .ok_or_else(|| RepositoryError::not_found(record.id()))?;
        self.records.borrow_mut()[index] = record.clone();
        tracing::debug!(id = %record.id(), "record updated");
        self.events.notify(&RepositoryEvent::Updated(record));
        Ok(())
    }

    fn delete(&self, id: &str) -> RepositoryResult<R> {
        let index = self
            .position(id)
            .ok_or_else(|| RepositoryError::not_found(id))?;
        let removed = self.records.borrow_mut().remove(index);
        tracing::debug!(id = %id, "record deleted");
        self.events.notify(&RepositoryEvent::Removed(removed.clone()));
        Ok(removed)
    }
}

impl<R: Record> fmt::Debug for MemoryRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("records", &self.records.borrow().len())
            .finish()
    }
}
