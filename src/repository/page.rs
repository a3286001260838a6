use std::fmt;

use crate::error::{RepositoryError, RepositoryResult};
use crate::query::{Filter, Sort, SortDirection, SortKey};
use crate::store::FindOptions;

/// Default 1-based page offset.
pub const DEFAULT_OFFSET: i64 = 1;
/// Default page size.
pub const DEFAULT_LIMIT: i64 = 1000;

/// Parameters of a paged read.
///
/// `filter` and `order_by` fall back to the repository's page defaults when
/// left empty.
pub struct PageRequest<D> {
    pub offset: i64,
    pub limit: i64,
    pub filter: Option<Filter<D>>,
    pub order_by: Option<SortKey<D>>,
    pub ascending: bool,
}

impl<D> Default for PageRequest<D> {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            filter: None,
            order_by: None,
            ascending: true,
        }
    }
}

impl<D> Clone for PageRequest<D> {
    fn clone(&self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit,
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            ascending: self.ascending,
        }
    }
}

impl<D> fmt::Debug for PageRequest<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("filter", &self.filter.is_some())
            .field("order_by", &self.order_by.is_some())
            .field("ascending", &self.ascending)
            .finish()
    }
}

impl<D> PageRequest<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `limit` documents at `offset`, everything else defaulted.
    pub fn page(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_filter(mut self, filter: Filter<D>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, key: SortKey<D>) -> Self {
        self.order_by = Some(key);
        self
    }

    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Both offset and limit must be at least 1.
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.offset < 1 {
            return Err(RepositoryError::OutOfRange {
                argument: "offset",
                value: self.offset,
            });
        }
        if self.limit < 1 {
            return Err(RepositoryError::OutOfRange {
                argument: "limit",
                value: self.limit,
            });
        }
        Ok(())
    }

    /// Number of documents skipped: the offset itself once past the first
    /// position, otherwise none.
    pub fn skip(&self) -> u64 {
        if self.offset > 1 {
            self.offset as u64
        } else {
            0
        }
    }

    /// Fill in the defaults and produce the store query.
    pub(crate) fn resolve(
        self,
        default_filter: impl FnOnce() -> Filter<D>,
        default_sort: impl FnOnce() -> SortKey<D>,
    ) -> (Filter<D>, FindOptions<D>) {
        let skip = self.skip();
        let limit = u64::try_from(self.limit).ok();
        let key = self.order_by.unwrap_or_else(default_sort);
        let options = FindOptions {
            skip,
            limit,
            sort: Some(Sort::new(key, SortDirection::from_ascending(self.ascending))),
        };
        (self.filter.unwrap_or_else(default_filter), options)
    }
}
