use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ops::{self, ensure_active};
use super::{PageRequest, Reading};
use crate::context::DbContext;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::{Filter, SortKey};
use crate::store::Collection;

/// Per-document read defaults for hook-driven repositories.
pub trait ReadQueries<D>: Send + Sync {
    /// Filter used by `get_count` and `get_page` when the caller gives none.
    fn default_filter(&self) -> Filter<D>;

    /// Sort key used by `get_page` when the caller gives none.
    fn default_sort(&self) -> SortKey<D>;
}

impl<D, Q: ReadQueries<D> + ?Sized> ReadQueries<D> for Arc<Q> {
    fn default_filter(&self) -> Filter<D> {
        (**self).default_filter()
    }

    fn default_sort(&self) -> SortKey<D> {
        (**self).default_sort()
    }
}

pub struct ReadingRepository<D: Document, Q> {
    collection: Arc<dyn Collection<D>>,
    queries: Q,
}

impl<D: Document, Q: ReadQueries<D>> ReadingRepository<D, Q> {
    pub fn new<C: DbContext>(context: &C, queries: Q) -> RepositoryResult<Self> {
        Ok(Self::from_collection(context.get::<D>()?, queries))
    }

    pub fn from_collection(collection: Arc<dyn Collection<D>>, queries: Q) -> Self {
        Self {
            collection,
            queries,
        }
    }
}

#[async_trait]
impl<D: Document, Q: ReadQueries<D>> Reading<D> for ReadingRepository<D, Q> {
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
        let filter = filter.unwrap_or_else(|| self.queries.default_filter());
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
            || self.queries.default_filter(),
            || self.queries.default_sort(),
        );
        ops::find_page(self.collection.as_ref(), &filter, options).await
    }
}
