//! Specification adapters - let any repository accept `Specification` objects.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ops::ensure_active;
use super::{Deleting, PageRequest, Reading};
use crate::document::Document;
use crate::error::RepositoryResult;
use crate::spec::{SortSpecification, Specification};

/// Specification-based reads.
///
/// Blanket-implemented for every `Reading<D>`.
#[async_trait]
pub trait SpecReading<D: Document>: Reading<D> {
    async fn get_by(
        &self,
        spec: &dyn Specification<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Option<D>> {
        self.get(spec.as_filter(), cancel).await
    }

    async fn get_count_by(
        &self,
        spec: Option<&dyn Specification<D>>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<u64> {
        self.get_count(spec.map(|spec| spec.as_filter()), cancel).await
    }

    /// Page through matching documents. Without a sort specification the
    /// repository's default key is used, ascending.
    async fn get_page_by(
        &self,
        offset: i64,
        limit: i64,
        spec: Option<&dyn Specification<D>>,
        sort: Option<&dyn SortSpecification<D>>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Vec<D>> {
        ensure_active(cancel)?;
        let mut request = PageRequest::page(offset, limit);
        request.validate()?;

        request.filter = spec.map(|spec| spec.as_filter());
        if let Some(sort) = sort {
            request.order_by = Some(sort.as_sort_key());
            request.ascending = sort.is_ascending();
        }
        self.get_page(request, cancel).await
    }
}

impl<D: Document, R: Reading<D>> SpecReading<D> for R {}

/// Specification-based delete.
///
/// Blanket-implemented for every repository that can both read and delete.
#[async_trait]
pub trait SpecDeleting<D: Document>: Reading<D> + Deleting<D> {
    /// Delete the first document matching `spec`; `false` when none matches.
    async fn delete_by(
        &self,
        spec: &dyn Specification<D>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<bool> {
        ensure_active(cancel)?;
        match self.get(spec.as_filter(), cancel).await? {
            Some(document) => self.delete(&document, cancel).await,
            None => Ok(false),
        }
    }
}

impl<D: Document, R: Reading<D> + Deleting<D>> SpecDeleting<D> for R {}
