//! ExpressionsFactory - maps query intents to filters and sort keys.
//!
//! Factory-driven repositories never hard-code a filter. They ask the injected
//! factory for the filter that fits the operation (`UpdateOne` for replace,
//! `DeleteMany` for bulk delete, `DefaultPage` when a page has no filter, ...).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Filter, QueryName, SortKey};

/// Produces the filter or sort key for a query intent.
pub trait ExpressionsFactory<D>: Send + Sync {
    /// Filter for an intent, optionally scoped to one document.
    fn filter(&self, query: QueryName, document: Option<&D>) -> Filter<D>;

    /// Filter for an intent scoped to a set of documents.
    fn filter_many(&self, query: QueryName, documents: &[D]) -> Filter<D>;

    /// Sort key for an intent.
    fn sort(&self, query: QueryName) -> SortKey<D>;
}

impl<D, F: ExpressionsFactory<D> + ?Sized> ExpressionsFactory<D> for Arc<F> {
    fn filter(&self, query: QueryName, document: Option<&D>) -> Filter<D> {
        (**self).filter(query, document)
    }

    fn filter_many(&self, query: QueryName, documents: &[D]) -> Filter<D> {
        (**self).filter_many(query, documents)
    }

    fn sort(&self, query: QueryName) -> SortKey<D> {
        (**self).sort(query)
    }
}

type DocumentFilter<D> = Arc<dyn Fn(&D) -> Filter<D> + Send + Sync>;
type DocumentsFilter<D> = Arc<dyn Fn(&[D]) -> Filter<D> + Send + Sync>;

/// Lookup-table `ExpressionsFactory`.
///
/// Resolution order for `filter`: the document-scoped entry (when a document is
/// given), then the static entry, then the catch-all read filter.
/// `filter_many` uses the intent's entry, then the `DeleteMany` entry, then the
/// catch-all. `sort` uses the intent's entry, then the default sort key.
///
/// Only read intents reach the catch-all. An unmapped write intent resolves
/// to `Filter::none()` and touches nothing.
pub struct ExpressionsTable<D> {
    fallback: Filter<D>,
    default_sort: SortKey<D>,
    filters: HashMap<QueryName, Filter<D>>,
    by_document: HashMap<QueryName, DocumentFilter<D>>,
    by_documents: HashMap<QueryName, DocumentsFilter<D>>,
    sorts: HashMap<QueryName, SortKey<D>>,
}

impl<D> fmt::Debug for ExpressionsTable<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionsTable")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("by_document", &self.by_document.keys().collect::<Vec<_>>())
            .field("by_documents", &self.by_documents.keys().collect::<Vec<_>>())
            .field("sorts", &self.sorts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D: 'static> ExpressionsTable<D> {
    /// Create a table with the catch-all read filter and the default sort key.
    pub fn new(fallback: Filter<D>, default_sort: SortKey<D>) -> Self {
        Self {
            fallback,
            default_sort,
            filters: HashMap::new(),
            by_document: HashMap::new(),
            by_documents: HashMap::new(),
            sorts: HashMap::new(),
        }
    }

    /// Map an intent to a fixed filter.
    pub fn with_filter(mut self, query: QueryName, filter: Filter<D>) -> Self {
        self.filters.insert(query, filter);
        self
    }

    /// Map an intent to a filter built from one document (e.g. key equality).
    pub fn with_document_filter<F>(mut self, query: QueryName, build: F) -> Self
    where
        F: Fn(&D) -> Filter<D> + Send + Sync + 'static,
    {
        self.by_document.insert(query, Arc::new(build));
        self
    }

    /// Map an intent to a filter built from a set of documents (e.g. id-set membership).
    pub fn with_documents_filter<F>(mut self, query: QueryName, build: F) -> Self
    where
        F: Fn(&[D]) -> Filter<D> + Send + Sync + 'static,
    {
        self.by_documents.insert(query, Arc::new(build));
        self
    }

    /// Map an intent to a sort key.
    pub fn with_sort(mut self, query: QueryName, key: SortKey<D>) -> Self {
        self.sorts.insert(query, key);
        self
    }

    fn fallback_for(&self, query: QueryName) -> Filter<D> {
        if query.is_read() {
            self.fallback.clone()
        } else {
            Filter::none()
        }
    }
}

impl<D: 'static> ExpressionsFactory<D> for ExpressionsTable<D> {
    fn filter(&self, query: QueryName, document: Option<&D>) -> Filter<D> {
        if let Some(document) = document {
            if let Some(build) = self.by_document.get(&query) {
                return build(document);
            }
        }

        self.filters
            .get(&query)
            .cloned()
            .unwrap_or_else(|| self.fallback_for(query))
    }

    fn filter_many(&self, query: QueryName, documents: &[D]) -> Filter<D> {
        match self
            .by_documents
            .get(&query)
            .or_else(|| self.by_documents.get(&QueryName::DeleteMany))
        {
            Some(build) => build(documents),
            None => self.fallback_for(query),
        }
    }

    fn sort(&self, query: QueryName) -> SortKey<D> {
        self.sorts
            .get(&query)
            .cloned()
            .unwrap_or_else(|| self.default_sort.clone())
    }
}
