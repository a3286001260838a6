use thiserror::Error;

use crate::context::ContextError;
use crate::store::StoreError;

/// Error type for repository operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    /// A paging argument was below its minimum of 1.
    #[error("{argument} is out of range: {value} (must be >= 1)")]
    OutOfRange { argument: &'static str, value: i64 },
    /// The cancellation token fired before the operation started.
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
