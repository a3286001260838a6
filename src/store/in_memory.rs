//! InMemoryDatabase - Vec-backed document store for testing and development.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::debug;

use super::{
    BulkWriteOptions, BulkWriteResult, Collection, Database, DeleteResult, DocumentId,
    FindOptions, InsertManyOptions, InsertManyResult, InsertOneResult, ReplaceOptions,
    ReplaceResult, StoreError, WriteFailure, WriteModel,
};
use crate::document::Document;
use crate::query::Filter;

/// Internal stored representation of a document.
struct StoredDocument {
    id: DocumentId,
    bytes: Vec<u8>,
}

type Documents = Arc<RwLock<Vec<StoredDocument>>>;

/// In-memory database: a map of named collections.
///
/// Clone-friendly via Arc; every clone and every collection handle resolved
/// from it share the same storage.
#[derive(Clone)]
pub struct InMemoryDatabase {
    name: String,
    collections: Arc<RwLock<HashMap<String, Documents>>>,
    sequence: Arc<AtomicU64>,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new("default")
    }
}

impl InMemoryDatabase {
    /// Create a new empty database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Arc::new(RwLock::new(HashMap::new())),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Names of the collections created so far, sorted.
    pub fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("collection_names"))?;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Typed handle to the named collection, created empty on first use.
    pub fn typed_collection<D: Document>(
        &self,
        name: &str,
    ) -> Result<InMemoryCollection<D>, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("collection"))?;

        let documents = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Vec::new())))
            .clone();

        Ok(InMemoryCollection {
            name: name.to_string(),
            documents,
            sequence: Arc::clone(&self.sequence),
            _marker: PhantomData,
        })
    }
}

impl Database for InMemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection<D: Document>(&self, name: &str) -> Result<Arc<dyn Collection<D>>, StoreError> {
        Ok(Arc::new(self.typed_collection::<D>(name)?))
    }
}

/// Handle to one in-memory collection.
///
/// Documents are stored as JSON bytes in insertion order.
pub struct InMemoryCollection<D> {
    name: String,
    documents: Documents,
    sequence: Arc<AtomicU64>,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for InMemoryCollection<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            documents: Arc::clone(&self.documents),
            sequence: Arc::clone(&self.sequence),
            _marker: PhantomData,
        }
    }
}

impl<D: Document> InMemoryCollection<D> {
    /// Create a standalone collection not attached to any database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(RwLock::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(1)),
            _marker: PhantomData,
        }
    }

    fn next_id(&self) -> DocumentId {
        DocumentId(self.sequence.fetch_add(1, Ordering::Relaxed))
    }

    fn encode(document: &D) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(document).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<D, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }

    /// Index of the first stored document matching `filter`.
    fn position(stored: &[StoredDocument], filter: &Filter<D>) -> Result<Option<usize>, StoreError> {
        for (index, entry) in stored.iter().enumerate() {
            if filter.matches(&Self::decode(&entry.bytes)?) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    fn push(&self, stored: &mut Vec<StoredDocument>, bytes: Vec<u8>) -> DocumentId {
        let id = self.next_id();
        stored.push(StoredDocument { id, bytes });
        id
    }

    fn replace_in(
        &self,
        stored: &mut Vec<StoredDocument>,
        filter: &Filter<D>,
        replacement: &D,
        upsert: bool,
    ) -> Result<ReplaceResult, StoreError> {
        let bytes = Self::encode(replacement)?;

        match Self::position(stored, filter)? {
            Some(index) => {
                let entry = &mut stored[index];
                // Identical content matches but does not count as modified.
                let modified = entry.bytes != bytes;
                if modified {
                    entry.bytes = bytes;
                }
                Ok(ReplaceResult {
                    matched_count: 1,
                    modified_count: u64::from(modified),
                    upserted_id: None,
                })
            }
            None if upsert => Ok(ReplaceResult {
                upserted_id: Some(self.push(stored, bytes)),
                ..ReplaceResult::default()
            }),
            None => Ok(ReplaceResult::default()),
        }
    }

    fn delete_in(
        stored: &mut Vec<StoredDocument>,
        filter: &Filter<D>,
        just_one: bool,
    ) -> Result<u64, StoreError> {
        if just_one {
            return match Self::position(stored, filter)? {
                Some(index) => {
                    let removed = stored.remove(index);
                    debug!("removed document {}", removed.id);
                    Ok(1)
                }
                None => Ok(0),
            };
        }

        let mut keep = Vec::with_capacity(stored.len());
        for entry in stored.iter() {
            keep.push(!filter.matches(&Self::decode(&entry.bytes)?));
        }
        let before = stored.len();
        let mut mask = keep.into_iter();
        stored.retain(|_| mask.next().unwrap_or(true));
        Ok((before - stored.len()) as u64)
    }

    fn apply_model(
        &self,
        stored: &mut Vec<StoredDocument>,
        model: WriteModel<D>,
        result: &mut BulkWriteResult,
    ) -> Result<(), StoreError> {
        match model {
            WriteModel::InsertOne { document } => {
                let bytes = Self::encode(&document)?;
                self.push(stored, bytes);
                result.inserted_count += 1;
            }
            WriteModel::ReplaceOne {
                filter,
                replacement,
                upsert,
            } => {
                let replaced = self.replace_in(stored, &filter, &replacement, upsert)?;
                result.matched_count += replaced.matched_count;
                result.modified_count += replaced.modified_count;
                if let Some(id) = replaced.upserted_id {
                    result.upserted_count += 1;
                    result.upserted_ids.push(id);
                }
            }
            WriteModel::DeleteOne { filter } => {
                result.deleted_count += Self::delete_in(stored, &filter, true)?;
            }
            WriteModel::DeleteMany { filter } => {
                result.deleted_count += Self::delete_in(stored, &filter, false)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<D: Document> Collection<D> for InMemoryCollection<D> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, document: &D) -> Result<InsertOneResult, StoreError> {
        let bytes = Self::encode(document)?;
        let mut stored = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_one"))?;

        let inserted_id = self.push(&mut stored, bytes);
        debug!("{}: inserted document {}", self.name, inserted_id);
        Ok(InsertOneResult { inserted_id })
    }

    async fn insert_many(
        &self,
        documents: &[D],
        options: InsertManyOptions,
    ) -> Result<InsertManyResult, StoreError> {
        let mut encoded = Vec::with_capacity(documents.len());
        let mut failures = Vec::new();
        for (index, document) in documents.iter().enumerate() {
            match Self::encode(document) {
                Ok(bytes) => encoded.push(bytes),
                Err(err) if options.ordered => return Err(err),
                Err(err) => failures.push(WriteFailure {
                    index,
                    message: err.to_string(),
                }),
            }
        }

        let mut stored = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_many"))?;

        let inserted_ids: Vec<DocumentId> = encoded
            .into_iter()
            .map(|bytes| self.push(&mut stored, bytes))
            .collect();
        debug!("{}: inserted {} document(s)", self.name, inserted_ids.len());

        if failures.is_empty() {
            Ok(InsertManyResult { inserted_ids })
        } else {
            Err(StoreError::BulkWrite {
                result: BulkWriteResult {
                    inserted_count: inserted_ids.len() as u64,
                    ..BulkWriteResult::default()
                },
                failures,
            })
        }
    }

    async fn replace_one(
        &self,
        filter: &Filter<D>,
        replacement: &D,
        options: ReplaceOptions,
    ) -> Result<ReplaceResult, StoreError> {
        let mut stored = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("replace_one"))?;

        let result = self.replace_in(&mut stored, filter, replacement, options.upsert)?;
        debug!(
            "{}: replace matched={} modified={} upserted={:?}",
            self.name, result.matched_count, result.modified_count, result.upserted_id
        );
        Ok(result)
    }

    async fn bulk_write(
        &self,
        models: Vec<WriteModel<D>>,
        options: BulkWriteOptions,
    ) -> Result<BulkWriteResult, StoreError> {
        let mut stored = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("bulk_write"))?;

        let total = models.len();
        let mut result = BulkWriteResult::default();
        let mut failures = Vec::new();

        for (index, model) in models.into_iter().enumerate() {
            if let Err(err) = self.apply_model(&mut stored, model, &mut result) {
                failures.push(WriteFailure {
                    index,
                    message: err.to_string(),
                });
                if options.ordered {
                    break;
                }
            }
        }

        debug!(
            "{}: bulk write of {} model(s) matched={} modified={} upserted={} deleted={} failed={}",
            self.name,
            total,
            result.matched_count,
            result.modified_count,
            result.upserted_count,
            result.deleted_count,
            failures.len()
        );

        if failures.is_empty() {
            Ok(result)
        } else {
            Err(StoreError::BulkWrite { result, failures })
        }
    }

    async fn delete_one(&self, filter: &Filter<D>) -> Result<DeleteResult, StoreError> {
        let mut stored = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_one"))?;

        let deleted_count = Self::delete_in(&mut stored, filter, true)?;
        debug!("{}: deleted {} document(s)", self.name, deleted_count);
        Ok(DeleteResult { deleted_count })
    }

    async fn delete_many(&self, filter: &Filter<D>) -> Result<DeleteResult, StoreError> {
        let mut stored = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_many"))?;

        let deleted_count = Self::delete_in(&mut stored, filter, false)?;
        debug!("{}: deleted {} document(s)", self.name, deleted_count);
        Ok(DeleteResult { deleted_count })
    }

    async fn find(&self, filter: &Filter<D>, options: FindOptions<D>) -> Result<Vec<D>, StoreError> {
        let mut matched = {
            let stored = self
                .documents
                .read()
                .map_err(|_| StoreError::LockPoisoned("find"))?;

            let mut matched = Vec::new();
            for entry in stored.iter() {
                let document = Self::decode(&entry.bytes)?;
                if filter.matches(&document) {
                    matched.push(document);
                }
            }
            matched
        };

        if let Some(sort) = &options.sort {
            sort.apply(&mut matched);
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        let page: Vec<D> = matched.into_iter().skip(skip).take(limit).collect();
        debug!(
            "{}: find skip={} limit={:?} returned {}",
            self.name,
            options.skip,
            options.limit,
            page.len()
        );
        Ok(page)
    }

    async fn count_documents(&self, filter: &Filter<D>) -> Result<u64, StoreError> {
        let stored = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned("count_documents"))?;

        let mut count = 0;
        for entry in stored.iter() {
            if filter.matches(&Self::decode(&entry.bytes)?) {
                count += 1;
            }
        }
        Ok(count)
    }
}
