//! DuckDB-backed document store
//!
//! Documents are kept as JSON text in a single table, ordered per
//! collection by insertion sequence:
//!
//! ```text
//! documents(collection VARCHAR, seq BIGINT, id VARCHAR, body VARCHAR)
//! ```

use super::definition::CollectionDef;
use crate::eager::{RelatedDocument, RelatedLoader, Relation};
use crate::error::{Error, Result};
use crate::query::QueryableCollection;
use crate::types::{Document, DocumentId, JsonValue};
use duckdb::{params, params_from_iter, Connection};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::path::Path;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection VARCHAR NOT NULL,
    seq BIGINT NOT NULL,
    id VARCHAR NOT NULL,
    body VARCHAR NOT NULL,
    PRIMARY KEY (collection, id)
);";

/// Document store on a DuckDB connection
pub struct DuckDbStore {
    /// DuckDB connection
    conn: Connection,
}

impl DuckDbStore {
    /// Open a transient in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store(format!("Failed to create DuckDB connection: {e}")))?;
        Self::with_connection(conn)
    }

    /// Open (or create) a store in a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::store(format!("Failed to open DuckDB file {}: {e}", path.display()))
        })?;
        Self::with_connection(conn)
    }

    /// Use an existing connection, creating the documents table if needed
    pub fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::store(format!("Failed to create documents table: {e}")))?;
        Ok(Self { conn })
    }

    /// Insert or replace a typed document
    pub fn insert<D: Document>(&self, document: &D) -> Result<()> {
        let body = serde_json::to_value(document)?;
        self.insert_raw(D::COLLECTION, document.id(), &body)
    }

    /// Insert or replace a raw document. Replacing keeps its position.
    pub fn insert_raw(&self, collection: &str, id: &str, body: &JsonValue) -> Result<()> {
        let body = serde_json::to_string(body)?;

        let updated = self
            .conn
            .execute(
                "UPDATE documents SET body = ? WHERE collection = ? AND id = ?",
                params![body, collection, id],
            )
            .map_err(|e| Error::store(format!("Failed to update document '{id}': {e}")))?;
        if updated > 0 {
            return Ok(());
        }

        let seq: i64 = self
            .conn
            .query_row(
                "SELECT CAST(COALESCE(MAX(seq), 0) + 1 AS BIGINT) \
                 FROM documents WHERE collection = ?",
                params![collection],
                |row| row.get(0),
            )
            .map_err(|e| Error::store(format!("Failed to allocate sequence: {e}")))?;

        self.conn
            .execute(
                "INSERT INTO documents (collection, seq, id, body) VALUES (?, ?, ?, ?)",
                params![collection, seq, id, body],
            )
            .map_err(|e| Error::store(format!("Failed to insert document '{id}': {e}")))?;

        Ok(())
    }

    /// Names of every collection holding at least one document
    pub fn collection_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT collection FROM documents ORDER BY collection")
            .map_err(|e| Error::store(format!("Failed to prepare query: {e}")))?;

        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| Error::store(format!("Failed to list collections: {e}")))?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(|e| Error::store(format!("Failed to read collection name: {e}")))?;

        Ok(names)
    }

    /// Handle to the collection of a document type
    pub fn collection<D: Document>(&self) -> DuckDbCollection<'_, D> {
        DuckDbCollection::new(self, CollectionDef::of::<D>())
    }

    /// Handle to an untyped collection
    pub fn raw_collection(&self, def: CollectionDef) -> DuckDbCollection<'_, JsonValue> {
        DuckDbCollection::new(self, def)
    }

    fn query_bodies(&self, sql: &str, values: &[String]) -> Result<Vec<(String, String)>> {
        tracing::debug!("Executing query: {}", sql);

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| Error::store(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| Error::store(format!("Failed to execute query: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::store(format!("Failed to read row: {e}")))?;

        Ok(rows)
    }
}

impl RelatedLoader for DuckDbStore {
    fn find_any_in(
        &self,
        collection: &str,
        ids: &BTreeSet<DocumentId>,
    ) -> Result<Vec<RelatedDocument>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, body FROM documents \
             WHERE collection = ? AND id IN ({placeholders}) ORDER BY seq"
        );
        let values: Vec<String> = std::iter::once(collection.to_string())
            .chain(ids.iter().cloned())
            .collect();

        self.query_bodies(&sql, &values)?
            .into_iter()
            .map(|(id, body)| {
                let body = parse_body(collection, &body)?;
                Ok(RelatedDocument { id, body })
            })
            .collect()
    }
}

/// Query over a [`DuckDbStore`] collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuckDbQuery {
    collection: String,
    offset: usize,
    limit: Option<usize>,
}

impl DuckDbQuery {
    /// SQL text for this query; the collection name is bound as the only
    /// parameter.
    ///
    /// DuckDB takes `LIMIT` and `OFFSET` as BIGINT, so larger values are
    /// clamped to `i64::MAX`.
    pub fn to_sql(&self) -> String {
        let mut sql =
            String::from("SELECT id, body FROM documents WHERE collection = ? ORDER BY seq");
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", to_bigint(limit)));
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", to_bigint(self.offset)));
        }
        sql
    }
}

/// Handle to one collection of a [`DuckDbStore`]
pub struct DuckDbCollection<'a, T> {
    store: &'a DuckDbStore,
    def: CollectionDef,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> DuckDbCollection<'a, T> {
    fn new(store: &'a DuckDbStore, def: CollectionDef) -> Self {
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

impl<T: DeserializeOwned> QueryableCollection for DuckDbCollection<'_, T> {
    type Item = T;
    type Query = DuckDbQuery;

    fn name(&self) -> &str {
        self.def.name()
    }

    fn default_page_size(&self) -> usize {
        self.def.page_size()
    }

    fn relations(&self) -> &[Relation] {
        self.def.relations()
    }

    fn query(&self) -> DuckDbQuery {
        DuckDbQuery {
            collection: self.def.name().to_string(),
            offset: 0,
            limit: None,
        }
    }

    fn restrict_offset_limit(
        &self,
        query: DuckDbQuery,
        offset: usize,
        limit: usize,
    ) -> DuckDbQuery {
        DuckDbQuery {
            offset,
            limit: (limit > 0).then_some(limit),
            ..query
        }
    }

    fn execute(&self, query: &DuckDbQuery) -> Result<Vec<T>> {
        self.store
            .query_bodies(&query.to_sql(), &[query.collection.clone()])?
            .into_iter()
            .map(|(_, body)| {
                let value = parse_body(&query.collection, &body)?;
                serde_json::from_value(value).map_err(|e| {
                    Error::decode(format!(
                        "Document in '{}' does not match its type: {e}",
                        query.collection
                    ))
                })
            })
            .collect()
    }

    fn count_all(&self) -> Result<u64> {
        let count: i64 = self
            .store
            .conn
            .query_row(
                "SELECT CAST(COUNT(*) AS BIGINT) FROM documents WHERE collection = ?",
                params![self.def.name()],
                |row| row.get(0),
            )
            .map_err(|e| Error::store(format!("Failed to count documents: {e}")))?;
        Ok(count.max(0) as u64)
    }
}

fn to_bigint(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn parse_body(collection: &str, body: &str) -> Result<JsonValue> {
    serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Stored document in '{collection}' is not JSON: {e}")))
}
