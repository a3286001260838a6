use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{Command, CommandRepository, Deleting, PageRequest, QueryRepository, Reading};
use crate::context::DbContext;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::{ExpressionsFactory, Filter};
use crate::store::Collection;

/// Full factory-driven repository: `QueryRepository` reads and
/// `CommandRepository` writes over one collection and one shared factory.
pub struct Repository<D: Document, F> {
    query: QueryRepository<D, Arc<F>>,
    command: CommandRepository<D, Arc<F>>,
}

impl<D: Document, F: ExpressionsFactory<D>> Repository<D, F> {
    pub fn new<C: DbContext>(context: &C, factory: F) -> RepositoryResult<Self> {
        Ok(Self::from_collection(context.get::<D>()?, factory))
    }

    pub fn from_collection(collection: Arc<dyn Collection<D>>, factory: F) -> Self {
        let factory = Arc::new(factory);
        Self {
            query: QueryRepository::from_collection(Arc::clone(&collection), Arc::clone(&factory)),
            command: CommandRepository::from_collection(collection, factory),
        }
    }
}

#[async_trait]
impl<D: Document, F: ExpressionsFactory<D>> Reading<D> for Repository<D, F> {
    async fn get(
        &self,
        filter: Filter<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Option<D>> {
        self.query.get(filter, cancel).await
    }

    async fn get_count(
        &self,
        filter: Option<Filter<D>>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<u64> {
        self.query.get_count(filter, cancel).await
    }

    async fn get_page(
        &self,
        request: PageRequest<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Vec<D>> {
        self.query.get_page(request, cancel).await
    }
}

#[async_trait]
impl<D: Document, F: ExpressionsFactory<D>> Deleting<D> for Repository<D, F> {
    async fn delete(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.command.delete(document, cancel).await
    }
}

#[async_trait]
impl<D: Document, F: ExpressionsFactory<D>> Command<D> for Repository<D, F> {
    async fn add(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.command.add(document, cancel).await
    }

    async fn add_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.command.add_many(documents, cancel).await
    }

    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.command.update(document, cancel).await
    }

    async fn update_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.command.update_many(documents, cancel).await
    }

    async fn delete_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.command.delete_many(documents, cancel).await
    }

    async fn add_or_update(
        &self,
        document: &D,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.command.add_or_update(document, cancel).await
    }
}
