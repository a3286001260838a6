use std::fmt;

use crate::query::{Sort, SortDirection, SortKey, SortValue};

/// Declares how a page is ordered: a key selector and a direction.
pub trait SortSpecification<D>: Send + Sync {
    fn as_sort_key(&self) -> SortKey<D>;

    fn is_ascending(&self) -> bool;

    fn to_sort(&self) -> Sort<D> {
        Sort::new(
            self.as_sort_key(),
            SortDirection::from_ascending(self.is_ascending()),
        )
    }
}

/// Ready-made sort specification.
pub struct SortBy<D> {
    key: SortKey<D>,
    direction: SortDirection,
}

impl<D> Clone for SortBy<D> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            direction: self.direction,
        }
    }
}

impl<D> fmt::Debug for SortBy<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortBy")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<D: 'static> SortBy<D> {
    pub fn new(key: SortKey<D>, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending<F, V>(selector: F) -> Self
    where
        F: Fn(&D) -> V + Send + Sync + 'static,
        V: Into<SortValue>,
    {
        Self::new(SortKey::new(selector), SortDirection::Ascending)
    }

    pub fn descending<F, V>(selector: F) -> Self
    where
        F: Fn(&D) -> V + Send + Sync + 'static,
        V: Into<SortValue>,
    {
        Self::new(SortKey::new(selector), SortDirection::Descending)
    }
}

impl<D> SortSpecification<D> for SortBy<D> {
    fn as_sort_key(&self) -> SortKey<D> {
        self.key.clone()
    }

    fn is_ascending(&self) -> bool {
        self.direction.is_ascending()
    }
}
