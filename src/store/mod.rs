//! Store - the document-database driver seam.
//!
//! `Database` resolves typed `Collection<D>` handles by name. `Collection<D>`
//! exposes the driver operations the repositories are built on, with result
//! types carrying the driver counts (matched, modified, deleted, inserted and
//! upserted ids). Repositories only depend on these traits; `InMemoryDatabase`
//! is the implementation shipped with the crate.

mod in_memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::Document;
use crate::query::{Filter, Sort};

pub use in_memory::{InMemoryCollection, InMemoryDatabase};

/// Error type for driver operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A storage lock was poisoned during the named operation.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Document (de)serialization failed.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// One or more elements of an unordered bulk write failed.
    #[error("bulk write failed for {} element(s)", .failures.len())]
    BulkWrite {
        result: BulkWriteResult,
        failures: Vec<WriteFailure>,
    },
}

/// One failed element of a bulk write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub index: usize,
    pub message: String,
}

/// Store-assigned identifier of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== Options =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertManyOptions {
    /// Stop at the first failing element when set.
    pub ordered: bool,
}

impl Default for InsertManyOptions {
    fn default() -> Self {
        Self { ordered: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOptions {
    /// Insert the replacement when nothing matches.
    pub upsert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkWriteOptions {
    pub ordered: bool,
}

impl Default for BulkWriteOptions {
    fn default() -> Self {
        Self { ordered: true }
    }
}

/// Options for `Collection::find`.
pub struct FindOptions<D> {
    pub skip: u64,
    pub limit: Option<u64>,
    pub sort: Option<Sort<D>>,
}

impl<D> Default for FindOptions<D> {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: None,
            sort: None,
        }
    }
}

impl<D> Clone for FindOptions<D> {
    fn clone(&self) -> Self {
        Self {
            skip: self.skip,
            limit: self.limit,
            sort: self.sort.clone(),
        }
    }
}

impl<D> fmt::Debug for FindOptions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindOptions")
            .field("skip", &self.skip)
            .field("limit", &self.limit)
            .field("sort", &self.sort)
            .finish()
    }
}

impl<D> FindOptions<D> {
    /// Options for a single-document lookup.
    pub fn first() -> Self {
        Self {
            limit: Some(1),
            ..Self::default()
        }
    }
}

// ===== Results =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOneResult {
    pub inserted_id: DocumentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsertManyResult {
    pub inserted_ids: Vec<DocumentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<DocumentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkWriteResult {
    pub inserted_count: u64,
    pub matched_count: u64,
    pub modified_count: u64,
    pub deleted_count: u64,
    pub upserted_count: u64,
    pub upserted_ids: Vec<DocumentId>,
}

/// One element of a bulk write.
pub enum WriteModel<D> {
    InsertOne {
        document: D,
    },
    ReplaceOne {
        filter: Filter<D>,
        replacement: D,
        upsert: bool,
    },
    DeleteOne {
        filter: Filter<D>,
    },
    DeleteMany {
        filter: Filter<D>,
    },
}

impl<D> fmt::Debug for WriteModel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteModel::InsertOne { .. } => f.write_str("InsertOne"),
            WriteModel::ReplaceOne { upsert, .. } => f
                .debug_struct("ReplaceOne")
                .field("upsert", upsert)
                .finish_non_exhaustive(),
            WriteModel::DeleteOne { .. } => f.write_str("DeleteOne"),
            WriteModel::DeleteMany { .. } => f.write_str("DeleteMany"),
        }
    }
}

// ===== Traits =====

/// A typed handle to one collection.
#[async_trait]
pub trait Collection<D: Document>: Send + Sync {
    /// The collection name.
    fn name(&self) -> &str;

    async fn insert_one(&self, document: &D) -> Result<InsertOneResult, StoreError>;

    async fn insert_many(
        &self,
        documents: &[D],
        options: InsertManyOptions,
    ) -> Result<InsertManyResult, StoreError>;

    /// Replace the first document matching `filter`.
    async fn replace_one(
        &self,
        filter: &Filter<D>,
        replacement: &D,
        options: ReplaceOptions,
    ) -> Result<ReplaceResult, StoreError>;

    /// Apply a batch of writes. With `ordered: false` a failing element does
    /// not stop the remaining ones; failures are reported as
    /// `StoreError::BulkWrite` carrying the partial result.
    async fn bulk_write(
        &self,
        models: Vec<WriteModel<D>>,
        options: BulkWriteOptions,
    ) -> Result<BulkWriteResult, StoreError>;

    /// Delete the first document matching `filter`.
    async fn delete_one(&self, filter: &Filter<D>) -> Result<DeleteResult, StoreError>;

    async fn delete_many(&self, filter: &Filter<D>) -> Result<DeleteResult, StoreError>;

    async fn find(&self, filter: &Filter<D>, options: FindOptions<D>) -> Result<Vec<D>, StoreError>;

    async fn count_documents(&self, filter: &Filter<D>) -> Result<u64, StoreError>;
}

/// A database that hands out collection handles by name.
pub trait Database: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve a typed handle to the named collection, creating it if needed.
    fn collection<D: Document>(&self, name: &str) -> Result<Arc<dyn Collection<D>>, StoreError>;
}

impl<B: Database> Database for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn collection<D: Document>(&self, name: &str) -> Result<Arc<dyn Collection<D>>, StoreError> {
        (**self).collection(name)
    }
}
