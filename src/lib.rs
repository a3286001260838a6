mod context;
mod document;
mod error;
mod query;
mod repository;
mod spec;
mod store;

pub use context::{CollectionNames, Context, ContextError, DbContext};
pub use document::Document;
pub use error::{RepositoryError, RepositoryResult};
pub use query::{
    ExpressionsFactory, ExpressionsTable, Filter, QueryName, Sort, SortDirection, SortKey,
    SortValue, UnknownQueryName,
};
pub use repository::{
    Command, CommandRepository, Deleting, ExtendedRepository, ExtendedWriting,
    ExtendedWritingRepository, KeyQueries, PageRequest, QueryRepository, ReadQueries, Reading,
    ReadingRepository, Repository, SpecDeleting, SpecReading, Writing, WritingRepository,
    DEFAULT_LIMIT, DEFAULT_OFFSET,
};
pub use spec::{SortBy, SortSpecification, Spec, Specification, SpecificationExt};
pub use store::{
    BulkWriteOptions, BulkWriteResult, Collection, Database, DeleteResult, DocumentId,
    FindOptions, InMemoryCollection, InMemoryDatabase, InsertManyOptions, InsertManyResult,
    InsertOneResult, ReplaceOptions, ReplaceResult, StoreError, WriteFailure, WriteModel,
};

// Re-export the derive macro alongside the trait it implements
pub use doc_repositories_macros::Document;

// Re-export the cancellation token every repository operation takes
pub use tokio_util::sync::CancellationToken;
