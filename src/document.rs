//! Document - the marker trait for every type stored in a collection.

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored in a document collection.
///
/// The repositories never look inside a document; they only need to move it
/// through the store and hand it to filters and sort keys.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Stable type name used in diagnostics (e.g. "Vehicle").
    ///
    /// Reported by `ContextError::CollectionNotFound` and used as the lookup key
    /// in `CollectionNames`.
    const NAME: &'static str;
}
