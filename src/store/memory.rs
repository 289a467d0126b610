//! In-memory document store

use super::definition::CollectionDef;
use crate::eager::{RelatedDocument, RelatedLoader, Relation};
use crate::error::{Error, Result};
use crate::query::QueryableCollection;
use crate::types::{Document, DocumentId, JsonValue};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError, RwLock};

/// A read served by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRecord {
    /// A collection query
    Find {
        collection: String,
        skip: usize,
        limit: Option<usize>,
    },
    /// A batched lookup by id
    FindAnyIn {
        collection: String,
        ids: Vec<DocumentId>,
    },
    /// A count
    Count { collection: String },
}

/// Documents kept in memory, in insertion order per collection.
///
/// Every read is appended to a query log, which makes the store useful for
/// checking how many round trips an operation made.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<RelatedDocument>>>,
    log: Mutex<Vec<QueryRecord>>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a typed document
    pub fn insert<D: Document>(&self, document: &D) -> Result<()> {
        let body = serde_json::to_value(document)?;
        self.insert_raw(D::COLLECTION, document.id(), body);
        Ok(())
    }

    /// Insert or replace a raw document. Replacing keeps its position.
    pub fn insert_raw(&self, collection: &str, id: &str, body: JsonValue) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let documents = collections.entry(collection.to_string()).or_default();
        match documents.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.body = body,
            None => documents.push(RelatedDocument {
                id: id.to_string(),
                body,
            }),
        }
    }

    /// Handle to the collection of a document type
    pub fn collection<D: Document>(&self) -> MemoryCollection<'_, D> {
        MemoryCollection::new(self, CollectionDef::of::<D>())
    }

    /// Handle to an untyped collection
    pub fn raw_collection(&self, def: CollectionDef) -> MemoryCollection<'_, JsonValue> {
        MemoryCollection::new(self, def)
    }

    /// Every read served so far
    pub fn query_log(&self) -> Vec<QueryRecord> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Forget the query log
    pub fn clear_log(&self) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Make the next read fail with a store error
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    fn record(&self, record: QueryRecord) -> Result<()> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(message) => Err(Error::store(message)),
            None => Ok(()),
        }
    }

    fn read<R>(&self, collection: &str, f: impl FnOnce(&[RelatedDocument]) -> R) -> R {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(collections.get(collection).map(Vec::as_slice).unwrap_or(&[]))
    }
}

impl RelatedLoader for MemoryStore {
    fn find_any_in(
        &self,
        collection: &str,
        ids: &BTreeSet<DocumentId>,
    ) -> Result<Vec<RelatedDocument>> {
        self.record(QueryRecord::FindAnyIn {
            collection: collection.to_string(),
            ids: ids.iter().cloned().collect(),
        })?;

        Ok(self.read(collection, |documents| {
            documents
                .iter()
                .filter(|d| ids.contains(&d.id))
                .cloned()
                .collect()
        }))
    }
}

/// Query over a [`MemoryStore`] collection
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryQuery {
    collection: String,
    filters: Vec<(String, JsonValue)>,
    skip: usize,
    limit: Option<usize>,
}

impl MemoryQuery {
    fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            filters: Vec::new(),
            skip: 0,
            limit: None,
        }
    }

    /// Only match documents whose `field` equals `value`
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Documents skipped
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Maximum documents returned, `None` when uncapped
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn matches(&self, body: &JsonValue) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| body.get(field) == Some(value))
    }
}

/// Handle to one collection of a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryCollection<'a, T> {
    store: &'a MemoryStore,
    def: CollectionDef,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> MemoryCollection<'a, T> {
    fn new(store: &'a MemoryStore, def: CollectionDef) -> Self {
        Self {
            store,
            def,
            _item: PhantomData,
        }
    }

    /// The collection's definition
    pub fn definition(&self) -> &CollectionDef {
        &self.def
    }
}

impl<T: DeserializeOwned> QueryableCollection for MemoryCollection<'_, T> {
    type Item = T;
    type Query = MemoryQuery;

    fn name(&self) -> &str {
        self.def.name()
    }

    fn default_page_size(&self) -> usize {
        self.def.page_size()
    }

    fn relations(&self) -> &[Relation] {
        self.def.relations()
    }

    fn query(&self) -> MemoryQuery {
        MemoryQuery::new(self.def.name())
    }

    fn restrict_offset_limit(
        &self,
        query: MemoryQuery,
        offset: usize,
        limit: usize,
    ) -> MemoryQuery {
        MemoryQuery {
            skip: offset,
            limit: (limit > 0).then_some(limit),
            ..query
        }
    }

    fn execute(&self, query: &MemoryQuery) -> Result<Vec<T>> {
        self.store.record(QueryRecord::Find {
            collection: query.collection.clone(),
            skip: query.skip,
            limit: query.limit,
        })?;

        let bodies: Vec<JsonValue> = self.store.read(&query.collection, |documents| {
            documents
                .iter()
                .filter(|d| query.matches(&d.body))
                .skip(query.skip)
                .take(query.limit.unwrap_or(usize::MAX))
                .map(|d| d.body.clone())
                .collect()
        });

        bodies
            .into_iter()
            .map(|body| {
                serde_json::from_value(body).map_err(|e| {
                    Error::decode(format!(
                        "Document in '{}' does not match its type: {e}",
                        query.collection
                    ))
                })
            })
            .collect()
    }

    fn count_all(&self) -> Result<u64> {
        self.store.record(QueryRecord::Count {
            collection: self.def.name().to_string(),
        })?;
        Ok(self.store.read(self.def.name(), |documents| documents.len() as u64))
    }
}
