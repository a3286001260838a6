//! Context - typed collection registry over a `Database`.
//!
//! Each document type is registered once with the name of the collection it
//! lives in. Repositories resolve their collection handle through the context
//! and fail with `ContextError::CollectionNotFound` when the type was never
//! registered.
//!
//! ## Example
//!
//! ```ignore
//! use doc_repositories::{Context, DbContext, InMemoryDatabase};
//!
//! let mut context = Context::new(InMemoryDatabase::new("fleet"));
//! context.register::<Vehicle>("vehicles")?;
//!
//! let vehicles = context.get::<Vehicle>()?;
//! ```

mod config;

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::document::Document;
use crate::store::{Collection, Database, StoreError};

pub use config::CollectionNames;

/// Error type for registry lookups and registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// The document type was never registered.
    #[error("Collection for {type_name} is not found")]
    CollectionNotFound { type_name: String },
    /// Collection names must not be empty or whitespace.
    #[error("invalid collection name: {name:?}")]
    InvalidCollectionName { name: String },
    /// The collection-name configuration could not be parsed.
    #[error("collection configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves typed collection handles.
pub trait DbContext: Send + Sync {
    /// Handle to the collection registered for `D`.
    fn get<D: Document>(&self) -> Result<Arc<dyn Collection<D>>, ContextError>;

    /// Handle to an explicitly named collection, bypassing the registry.
    fn get_named<D: Document>(&self, name: &str) -> Result<Arc<dyn Collection<D>>, ContextError>;
}

/// Registry mapping document types to collection names.
pub struct Context<B: Database> {
    database: B,
    collections: HashMap<TypeId, String>,
}

impl<B: Database> fmt::Debug for Context<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("database", &self.database.name())
            .field("collections", &self.collections.values().collect::<Vec<_>>())
            .finish()
    }
}

fn validate_name(name: &str) -> Result<(), ContextError> {
    if name.trim().is_empty() {
        return Err(ContextError::InvalidCollectionName {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl<B: Database> Context<B> {
    pub fn new(database: B) -> Self {
        Self {
            database,
            collections: HashMap::new(),
        }
    }

    pub fn database(&self) -> &B {
        &self.database
    }

    /// Register the collection name for `D`.
    ///
    /// Returns `Ok(false)` without touching the existing mapping when `D` is
    /// already registered.
    pub fn register<D: Document>(&mut self, name: impl Into<String>) -> Result<bool, ContextError> {
        let name = name.into();
        validate_name(&name)?;

        match self.collections.entry(TypeId::of::<D>()) {
            Entry::Occupied(existing) => {
                debug!(
                    "{} already registered to {}, ignoring {}",
                    D::NAME,
                    existing.get(),
                    name
                );
                Ok(false)
            }
            Entry::Vacant(slot) => {
                debug!("registered {} to collection {}", D::NAME, name);
                slot.insert(name);
                Ok(true)
            }
        }
    }

    /// Register `D` under the name configured for `D::NAME`.
    pub fn register_configured<D: Document>(
        &mut self,
        names: &CollectionNames,
    ) -> Result<bool, ContextError> {
        let name = names
            .name_for::<D>()
            .ok_or_else(|| ContextError::CollectionNotFound {
                type_name: D::NAME.to_string(),
            })?
            .to_string();
        self.register::<D>(name)
    }

    /// The collection name registered for `D`.
    pub fn collection_name<D: Document>(&self) -> Result<&str, ContextError> {
        self.collections
            .get(&TypeId::of::<D>())
            .map(String::as_str)
            .ok_or_else(|| ContextError::CollectionNotFound {
                type_name: D::NAME.to_string(),
            })
    }

    pub fn is_registered<D: Document>(&self) -> bool {
        self.collections.contains_key(&TypeId::of::<D>())
    }
}

impl<B: Database> DbContext for Context<B> {
    fn get<D: Document>(&self) -> Result<Arc<dyn Collection<D>>, ContextError> {
        let name = self.collection_name::<D>()?;
        Ok(self.database.collection::<D>(name)?)
    }

    fn get_named<D: Document>(&self, name: &str) -> Result<Arc<dyn Collection<D>>, ContextError> {
        validate_name(name)?;
        Ok(self.database.collection::<D>(name)?)
    }
}

impl<C: DbContext> DbContext for Arc<C> {
    fn get<D: Document>(&self) -> Result<Arc<dyn Collection<D>>, ContextError> {
        (**self).get::<D>()
    }

    fn get_named<D: Document>(&self, name: &str) -> Result<Arc<dyn Collection<D>>, ContextError> {
        (**self).get_named::<D>(name)
    }
}
