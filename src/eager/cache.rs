//! Identity map for prefetched documents

use crate::error::{Error, Result};
use crate::types::{Document, DocumentId, JsonValue};
use std::collections::HashMap;

/// Cache of documents keyed by collection and id.
///
/// Prefetching fills it; later lookups of related documents read from it
/// instead of going back to the store.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    collections: HashMap<String, HashMap<DocumentId, JsonValue>>,
}

impl IdentityMap {
    /// Create an empty identity map
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, replacing any previous copy
    pub fn insert(&mut self, collection: &str, id: DocumentId, document: JsonValue) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, document);
    }

    /// Raw cached document
    pub fn get(&self, collection: &str, id: &str) -> Option<&JsonValue> {
        self.collections.get(collection)?.get(id)
    }

    /// Cached document decoded as `D`
    pub fn get_as<D: Document>(&self, id: &str) -> Result<Option<D>> {
        self.get(D::COLLECTION, id)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    Error::decode(format!(
                        "Cached document '{id}' in '{}' does not match its type: {e}",
                        D::COLLECTION
                    ))
                })
            })
            .transpose()
    }

    /// Whether a document is cached
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.get(collection, id).is_some()
    }

    /// Cached documents of one collection, ordered by id
    pub fn documents(&self, collection: &str) -> Vec<(&str, &JsonValue)> {
        let mut documents: Vec<_> = self
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .map(|(id, document)| (id.as_str(), document))
            .collect();
        documents.sort_by(|a, b| a.0.cmp(b.0));
        documents
    }

    /// Number of cached documents in one collection
    pub fn len_of(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, HashMap::len)
    }

    /// Total number of cached documents
    pub fn len(&self) -> usize {
        self.collections.values().map(HashMap::len).sum()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.collections.clear();
    }
}
