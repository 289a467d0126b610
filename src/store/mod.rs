//! Document stores
//!
//! Two [`QueryableCollection`](crate::query::QueryableCollection) and
//! [`RelatedLoader`](crate::eager::RelatedLoader) implementations:
//!
//! - [`MemoryStore`] - documents held in process, with a log of every read
//!   it served
//! - [`DuckDbStore`] - documents persisted as JSON rows in a DuckDB database

mod definition;
mod duckdb_store;
mod memory;

pub use definition::CollectionDef;
pub use duckdb_store::{DuckDbCollection, DuckDbQuery, DuckDbStore};
pub use memory::{MemoryCollection, MemoryQuery, MemoryStore, QueryRecord};
