use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::PageRequest;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::Filter;

// ===== Reading =====

/// Read-only access to one collection.
#[async_trait]
pub trait Reading<D: Document>: Send + Sync {
    /// First document matching `filter`, or `None`.
    async fn get(&self, filter: Filter<D>, cancel: &CancellationToken)
        -> RepositoryResult<Option<D>>;

    /// Count of matching documents; `None` uses the repository's default filter.
    async fn get_count(
        &self,
        filter: Option<Filter<D>>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<u64>;

    /// One page of documents, sorted by the requested (or default) key.
    async fn get_page(
        &self,
        request: PageRequest<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Vec<D>>;
}

// ===== Writing =====

#[async_trait]
pub trait Deleting<D: Document>: Send + Sync {
    /// Delete the document with the same key. `true` if one was removed.
    async fn delete(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool>;
}

/// Write side paired with factory-driven queries.
#[async_trait]
pub trait Command<D: Document>: Deleting<D> {
    async fn add(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool>;

    /// Unordered insert; `false` for an empty slice.
    async fn add_many(&self, documents: &[D], cancel: &CancellationToken)
        -> RepositoryResult<bool>;

    /// Replace by key without upsert; `true` only if exactly one document changed.
    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool>;

    /// Unordered bulk replace without upsert; `true` only if every document changed.
    async fn update_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool>;

    /// Delete by key set; `true` only if every key was removed.
    async fn delete_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool>;

    /// Update when the key exists once, add when absent, otherwise do nothing.
    async fn add_or_update(&self, document: &D, cancel: &CancellationToken)
        -> RepositoryResult<bool>;
}

#[async_trait]
pub trait Writing<D: Document>: Deleting<D> {
    async fn create(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool>;

    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool>;

    /// Single upsert; `true` if a document changed or was inserted.
    async fn create_or_update(
        &self,
        document: &D,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait ExtendedWriting<D: Document>: Writing<D> {
    async fn create_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool>;

    /// Bulk upsert; `true` only if modified plus inserted equals the input length.
    async fn update_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool>;

    async fn delete_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool>;
}
