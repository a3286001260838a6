use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use tokio_util::sync::CancellationToken;

use super::ops::{self, ensure_active};
use super::{Command, Deleting};
use crate::context::DbContext;
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::query::{ExpressionsFactory, QueryName};
use crate::store::Collection;

/// Write-side repository whose key filters come from an `ExpressionsFactory`.
///
/// `UpdateOne` isolates the document to replace (and the match count behind
/// `add_or_update`), `DeleteOne` the document to delete and `DeleteMany` the
/// key set of a bulk delete. A factory that leaves one of these unmapped makes
/// the matching write a no-op that reports `false`.
pub struct CommandRepository<D: Document, F> {
    collection: Arc<dyn Collection<D>>,
    factory: F,
}

impl<D: Document, F: ExpressionsFactory<D>> CommandRepository<D, F> {
    pub fn new<C: DbContext>(context: &C, factory: F) -> RepositoryResult<Self> {
        Ok(Self::from_collection(context.get::<D>()?, factory))
    }

    pub fn from_collection(collection: Arc<dyn Collection<D>>, factory: F) -> Self {
        Self {
            collection,
            factory,
        }
    }
}

#[async_trait]
impl<D: Document, F: ExpressionsFactory<D>> Deleting<D> for CommandRepository<D, F> {
    async fn delete(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let filter = self.factory.filter(QueryName::DeleteOne, Some(document));
        ops::delete_one(self.collection.as_ref(), &filter).await
    }
}

#[async_trait]
impl<D: Document, F: ExpressionsFactory<D>> Command<D> for CommandRepository<D, F> {
    async fn add(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        ops::insert_one(self.collection.as_ref(), document).await
    }

    async fn add_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        ops::insert_many(self.collection.as_ref(), documents).await
    }

    async fn update(&self, document: &D, cancel: &CancellationToken) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let filter = self.factory.filter(QueryName::UpdateOne, Some(document));
        ops::replace_one(self.collection.as_ref(), &filter, document).await
    }

    async fn update_many(
        &self,
        documents: &[D],
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let replacements = documents
            .iter()
            .map(|document| {
                (
                    self.factory.filter(QueryName::UpdateOne, Some(document)),
                    document.clone(),
                )
            })
            .collect();
        ops::replace_many(self.collection.as_ref(), replacements, false).await
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
        let filter = self.factory.filter_many(QueryName::DeleteMany, documents);
        ops::delete_many(self.collection.as_ref(), &filter, documents.len()).await
    }

    async fn add_or_update(
        &self,
        document: &D,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        let filter = self.factory.filter(QueryName::UpdateOne, Some(document));
        match ops::count(self.collection.as_ref(), &filter).await? {
            0 => self.add(document, cancel).await,
            1 => self.update(document, cancel).await,
            matches => {
                warn!(
                    "{}: add_or_update key matched {} documents, nothing written",
                    self.collection.name(),
                    matches
                );
                Ok(false)
            }
        }
    }
}
