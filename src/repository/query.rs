use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ops::{self, ensure_active};
use super::{PageRequest, Reading};
use crate::context::DbContext;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::{ExpressionsFactory, Filter, QueryName};
use crate::store::Collection;

/// Read-only repository whose default filters and sorts come from an
/// `ExpressionsFactory`.
pub struct QueryRepository<D: Document, F> {
    collection: Arc<dyn Collection<D>>,
    factory: F,
}

impl<D: Document, F: ExpressionsFactory<D>> QueryRepository<D, F> {
    /// Resolve the collection registered for `D`.
    pub fn new<C: DbContext>(context: &C, factory: F) -> RepositoryResult<Self> {
        Ok(Self::from_collection(context.get::<D>()?, factory))
    }

    pub fn from_collection(collection: Arc<dyn Collection<D>>, factory: F) -> Self {
        Self {
            collection,
            factory,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

#[async_trait]
impl<D: Document, F: ExpressionsFactory<D>> Reading<D> for QueryRepository<D, F> {
    async fn get(
        &self,
        filter: Filter<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Option<D>> {
        ensure_active(cancel)?;
        ops::find_first(self.collection.as_ref(), &filter).await
    }

    async fn get_count(
        &self,
        filter: Option<Filter<D>>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<u64> {
        ensure_active(cancel)?;
        let filter =
            filter.unwrap_or_else(|| self.factory.filter(QueryName::DefaultCount, None));
        ops::count(self.collection.as_ref(), &filter).await
    }

    async fn get_page(
        &self,
        request: PageRequest<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Vec<D>> {
        ensure_active(cancel)?;
        request.validate()?;
        let (filter, options) = request.resolve(
            || self.factory.filter(QueryName::DefaultPage, None),
            || self.factory.sort(QueryName::DefaultPage),
        );
        ops::find_page(self.collection.as_ref(), &filter, options).await
    }
}
