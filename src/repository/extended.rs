use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{
    Deleting, ExtendedWriting, ExtendedWritingRepository, KeyQueries, PageRequest, ReadQueries,
    Reading, ReadingRepository, Writing,
};
use crate::context::DbContext;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::Filter;
use crate::store::Collection;

/// Hook-driven repository with reads, single writes and bulk upserts.
pub struct ExtendedRepository<D: Document, Q> {
    reading: ReadingRepository<D, Arc<Q>>,
    writing: ExtendedWritingRepository<D, Arc<Q>>,
}

impl<D, Q> ExtendedRepository<D, Q>
where
    D: Document,
    Q: ReadQueries<D> + KeyQueries<D>,
{
    pub fn new<C: DbContext>(context: &C, queries: Q) -> RepositoryResult<Self> {
        Ok(Self::from_collection(context.get::<D>()?, queries))
    }

    pub fn from_collection(collection: Arc<dyn Collection<D>>, queries: Q) -> Self {
        let queries = Arc::new(queries);
        Self {
            reading: ReadingRepository::from_collection(Arc::clone(&collection), Arc::clone(&queries)),
            writing: ExtendedWritingRepository::from_collection(collection, queries),
        }
    }
}

#[async_trait]
impl<D, Q> Reading<D> for ExtendedRepository<D, Q>
where
    D: Document,
    Q: ReadQueries<D> + KeyQueries<D>,
{
    async fn get(
        &self,
        filter: Filter<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Option<D>> {
        self.reading.get(filter, cancel).await
    }

    async fn get_count(
        &self,
        filter: Option<Filter<D>>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<u64> {
        self.reading.get_count(filter, cancel).await
    }

    async fn get_page(
        &self,
        request: PageRequest<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Vec<D>> {
        self.reading.get_page(request, cancel).await
    }
}

#[async_trait]
impl<D, Q> Deleting<D> for ExtendedRepository<D, Q>
where
    D: Document,
    Q: ReadQueries<D> + KeyQueries<D>,
{
    async fn delete(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.writing.delete(document, cancel).await
    }
}

#[async_trait]
impl<D, Q> Writing<D> for ExtendedRepository<D, Q>
where
    D: Document,
    Q: ReadQueries<D> + KeyQueries<D>,
{
    async fn create(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.writing.create(document, cancel).await
    }

    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.writing.update(document, cancel).await
    }

    async fn create_or_update(
        &self,
        document: &D,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.writing.create_or_update(document, cancel).await
    }
}

#[async_trait]
impl<D, Q> ExtendedWriting<D> for ExtendedRepository<D, Q>
where
    D: Document,
    Q: ReadQueries<D> + KeyQueries<D>,
{
    async fn create_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.writing.create_many(documents, cancel).await
    }

    async fn update_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.writing.update_many(documents, cancel).await
    }

    async fn delete_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.writing.delete_many(documents, cancel).await
    }
}
