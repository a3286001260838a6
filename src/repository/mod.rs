//! Repositories - typed data access over one collection.
//!
//! Two families share the same capability traits:
//!
//! - factory-driven (`QueryRepository`, `CommandRepository`, `Repository`):
//!   every filter comes from an injected `ExpressionsFactory` keyed by
//!   `QueryName`.
//! - hook-driven (`ReadingRepository`, `WritingRepository`,
//!   `ExtendedWritingRepository`, `ExtendedRepository`): defaults come from
//!   `ReadQueries` and key filters from `KeyQueries`.
//!
//! Every operation takes a `CancellationToken` and fails with
//! `RepositoryError::Cancelled` before touching the store once it fires.

mod command;
mod extended;
mod ops;
mod page;
mod query;
mod reading;
#[allow(clippy::module_inception)]
mod repository;
mod spec;
mod traits;
mod writing;

pub use command::CommandRepository;
pub use extended::ExtendedRepository;
pub use page::{PageRequest, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use query::QueryRepository;
pub use reading::{ReadQueries, ReadingRepository};
pub use repository::Repository;
pub use spec::{SpecDeleting, SpecReading};
pub use traits::{Command, Deleting, ExtendedWriting, Reading, Writing};
pub use writing::{ExtendedWritingRepository, KeyQueries, WritingRepository};
