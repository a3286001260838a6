//! Filter - the primitive predicate every query is reduced to.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A boolean predicate over a document.
///
/// Cheap to clone (the closure is shared), and stateless: building one per
/// call is the expected usage.
pub struct Filter<D> {
    predicate: Arc<dyn Fn(&D) -> bool + Send + Sync>,
}

impl<D> Clone for Filter<D> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<D> fmt::Debug for Filter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").finish_non_exhaustive()
    }
}

impl<D: 'static> Filter<D> {
    /// Wrap a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Matches every document.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    /// Matches no document.
    pub fn none() -> Self {
        Self::new(|_| false)
    }

    /// Matches documents whose key equals `value`.
    pub fn key_eq<K, F>(value: K, key: F) -> Self
    where
        K: PartialEq + Send + Sync + 'static,
        F: Fn(&D) -> K + Send + Sync + 'static,
    {
        Self::new(move |document| key(document) == value)
    }

    /// Matches documents whose key is one of `keys` (id-set membership).
    pub fn key_in<K, I, F>(keys: I, key: F) -> Self
    where
        K: Eq + Hash + Send + Sync + 'static,
        I: IntoIterator<Item = K>,
        F: Fn(&D) -> K + Send + Sync + 'static,
    {
        let keys: HashSet<K> = keys.into_iter().collect();
        Self::new(move |document| keys.contains(&key(document)))
    }
}

impl<D> Filter<D> {
    /// Evaluate the predicate against a document.
    pub fn matches(&self, document: &D) -> bool {
        (self.predicate)(document)
    }
}
