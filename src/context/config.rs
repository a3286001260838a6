use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ContextError;
use crate::document::Document;

/// Collection names keyed by document type name (`Document::NAME`).
///
/// Deserializes from a flat JSON object such as `{"Vehicle": "vehicles"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionNames {
    names: BTreeMap<String, String>,
}

impl CollectionNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the collection name for a type name.
    pub fn with(mut self, type_name: impl Into<String>, collection: impl Into<String>) -> Self {
        self.names.insert(type_name.into(), collection.into());
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&str> {
        self.names.get(type_name).map(String::as_str)
    }

    pub fn name_for<D: Document>(&self) -> Option<&str> {
        self.get(D::NAME)
    }

    pub fn from_json(json: &str) -> Result<Self, ContextError> {
        serde_json::from_str(json).map_err(|e| ContextError::Config(e.to_string()))
    }
}
