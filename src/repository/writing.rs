use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ops::{self, ensure_active};
use super::{Deleting, ExtendedWriting, Writing};
use crate::context::DbContext;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::Filter;
use crate::store::Collection;

/// Key filters for hook-driven write repositories.
pub trait KeyQueries<D: Document>: Send + Sync {
    /// Filter isolating the stored document with the same key as `document`.
    fn key_filter(&self, document: &D) -> Filter<D>;

    /// Filter matching every stored document sharing a key with `documents`.
    ///
    /// Defaults to the OR of the individual key filters; override with an
    /// id-set filter when keys are hashable.
    fn keys_filter(&self, documents: &[D]) -> Filter<D> {
        let filters: Vec<Filter<D>> = documents.iter().map(|d| self.key_filter(d)).collect();
        Filter::new(move |candidate| filters.iter().any(|f| f.matches(candidate)))
    }
}

impl<D: Document, Q: KeyQueries<D> + ?Sized> KeyQueries<D> for Arc<Q> {
    fn key_filter(&self, document: &D) -> Filter<D> {
        (**self).key_filter(document)
    }

    fn keys_filter(&self, documents: &[D]) -> Filter<D> {
        (**self).keys_filter(documents)
    }
}

/// Single-document writes keyed by `KeyQueries`.
pub struct WritingRepository<D: Document, Q> {
    collection: Arc<dyn Collection<D>>,
    queries: Q,
}

impl<D: Document, Q: KeyQueries<D>> WritingRepository<D, Q> {
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
impl<D: Document, Q: KeyQueries<D>> Deleting<D> for WritingRepository<D, Q> {
    async fn delete(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let filter = self.queries.key_filter(document);
        ops::delete_one(self.collection.as_ref(), &filter).await
    }
}

#[async_trait]
impl<D: Document, Q: KeyQueries<D>> Writing<D> for WritingRepository<D, Q> {
    async fn create(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        ops::insert_one(self.collection.as_ref(), document).await
    }

    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let filter = self.queries.key_filter(document);
        ops::replace_one(self.collection.as_ref(), &filter, document).await
    }

    async fn create_or_update(
        &self,
        document: &D,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let filter = self.queries.key_filter(document);
        ops::upsert_one(self.collection.as_ref(), &filter, document).await
    }
}

/// `WritingRepository` plus unordered bulk writes with upsert semantics.
pub struct ExtendedWritingRepository<D: Document, Q> {
    inner: WritingRepository<D, Q>,
}

impl<D: Document, Q: KeyQueries<D>> ExtendedWritingRepository<D, Q> {
    pub fn new<C: DbContext>(context: &C, queries: Q) -> RepositoryResult<Self> {
        Ok(Self::from_collection(context.get::<D>()?, queries))
    }

    pub fn from_collection(collection: Arc<dyn Collection<D>>, queries: Q) -> Self {
        Self {
            inner: WritingRepository::from_collection(collection, queries),
        }
    }

    fn collection(&self) -> &dyn Collection<D> {
        self.inner.collection.as_ref()
    }
}

#[async_trait]
impl<D: Document, Q: KeyQueries<D>> Deleting<D> for ExtendedWritingRepository<D, Q> {
    async fn delete(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.inner.delete(document, cancel).await
    }
}

#[async_trait]
impl<D: Document, Q: KeyQueries<D>> Writing<D> for ExtendedWritingRepository<D, Q> {
    async fn create(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.inner.create(document, cancel).await
    }

    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        self.inner.update(document, cancel).await
    }

    async fn create_or_update(
        &self,
        document: &D,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        self.inner.create_or_update(document, cancel).await
    }
}

#[async_trait]
impl<D: Document, Q: KeyQueries<D>> ExtendedWriting<D> for ExtendedWritingRepository<D, Q> {
    async fn create_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        ops::insert_many(self.collection(), documents).await
    }

    async fn update_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let replacements = documents
            .iter()
            .map(|document| (self.inner.queries.key_filter(document), document.clone()))
            .collect();
        ops::replace_many(self.collection(), replacements, true).await
    }

    async fn delete_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        if documents.is_empty() {
            return Ok(false);
        }
        let filter = self.inner.queries.keys_filter(documents);
        ops::delete_many(self.collection(), &filter, documents.len()).await
    }
}
