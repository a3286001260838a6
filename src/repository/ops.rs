//! Store calls shared by every repository, with result reconciliation.

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::document::Document;
use crate::error::{RepositoryError, RepositoryResult};
use crate::query::Filter;
use crate::store::{
    BulkWriteOptions, Collection, FindOptions, InsertManyOptions, ReplaceOptions, StoreError,
    WriteModel,
};

pub(crate) fn ensure_active(cancel: &CancellationToken) -> RepositoryResult<()> {
    if cancel.is_cancelled() {
        return Err(RepositoryError::Cancelled);
    }
    Ok(())
}

pub(crate) async fn find_first<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
) -> RepositoryResult<Option<D>> {
    let found = collection.find(filter, FindOptions::first()).await?;
    debug!("{}: get found {}", collection.name(), found.len());
    Ok(found.into_iter().next())
}

pub(crate) async fn count<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
) -> RepositoryResult<u64> {
    Ok(collection.count_documents(filter).await?)
}

pub(crate) async fn find_page<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
    options: FindOptions<D>,
) -> RepositoryResult<Vec<D>> {
    Ok(collection.find(filter, options).await?)
}

pub(crate) async fn insert_one<D: Document>(
    collection: &dyn Collection<D>,
    document: &D,
) -> RepositoryResult<bool> {
    collection.insert_one(document).await?;
    Ok(true)
}

/// Unordered insert. Empty input is a no-op reported as `false`.
pub(crate) async fn insert_many<D: Document>(
    collection: &dyn Collection<D>,
    documents: &[D],
) -> RepositoryResult<bool> {
    if documents.is_empty() {
        return Ok(false);
    }
    collection
        .insert_many(documents, InsertManyOptions { ordered: false })
        .await?;
    Ok(true)
}

/// Replace without upsert; succeeds only when exactly one document changed.
pub(crate) async fn replace_one<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
    document: &D,
) -> RepositoryResult<bool> {
    let result = collection
        .replace_one(filter, document, ReplaceOptions { upsert: false })
        .await?;
    Ok(result.modified_count == 1)
}

/// Native upsert; succeeds when something changed or a document was inserted.
pub(crate) async fn upsert_one<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
    document: &D,
) -> RepositoryResult<bool> {
    let result = collection
        .replace_one(filter, document, ReplaceOptions { upsert: true })
        .await?;
    Ok(result.modified_count > 0 || result.upserted_id.is_some())
}

/// Unordered bulk replace.
///
/// Succeeds only when every element was applied: modified, or with `upsert`
/// modified plus upserted. Element failures reported by the store are folded
/// into the same count check.
pub(crate) async fn replace_many<D: Document>(
    collection: &dyn Collection<D>,
    replacements: Vec<(Filter<D>, D)>,
    upsert: bool,
) -> RepositoryResult<bool> {
    if replacements.is_empty() {
        return Ok(false);
    }

    let expected = replacements.len() as u64;
    let models = replacements
        .into_iter()
        .map(|(filter, replacement)| WriteModel::ReplaceOne {
            filter,
            replacement,
            upsert,
        })
        .collect();

    let result = match collection
        .bulk_write(models, BulkWriteOptions { ordered: false })
        .await
    {
        Ok(result) => result,
        Err(StoreError::BulkWrite { result, failures }) => {
            warn!(
                "{}: {} of {} replacement(s) failed",
                collection.name(),
                failures.len(),
                expected
            );
            result
        }
        Err(err) => return Err(err.into()),
    };

    let applied = if upsert {
        result.modified_count + result.upserted_count
    } else {
        result.modified_count
    };
    if applied != expected {
        warn!(
            "{}: bulk replace applied {} of {} document(s)",
            collection.name(),
            applied,
            expected
        );
    }
    Ok(applied == expected)
}

pub(crate) async fn delete_one<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
) -> RepositoryResult<bool> {
    let result = collection.delete_one(filter).await?;
    Ok(result.deleted_count > 0)
}

/// Delete by id-set; succeeds only when `expected` documents were removed.
pub(crate) async fn delete_many<D: Document>(
    collection: &dyn Collection<D>,
    filter: &Filter<D>,
    expected: usize,
) -> RepositoryResult<bool> {
    let result = collection.delete_many(filter).await?;
    let expected = expected as u64;
    if result.deleted_count != expected {
        warn!(
            "{}: deleted {} of {} document(s)",
            collection.name(),
            result.deleted_count,
            expected
        );
    }
    Ok(result.deleted_count == expected)
}
