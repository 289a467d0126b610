//! Queryable collection trait

use crate::eager::Relation;
use crate::error::Result;
use crate::settings::DEFAULT_PAGE_SIZE;

/// A document collection a store can query.
///
/// Stores implement this once per collection handle; pagination is layered
/// on top through [`Paginate`](super::Paginate).
pub trait QueryableCollection {
    /// Decoded document type
    type Item;

    /// The store's query value. Restricting returns a new query, so a base
    /// query can be reused.
    type Query: Clone;

    /// Collection name, used to look up runtime settings
    fn name(&self) -> &str;

    /// Page size when neither the caller nor runtime settings give one
    fn default_page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Relations documents of this collection can eager load
    fn relations(&self) -> &[Relation] {
        &[]
    }

    /// A query matching every document in the collection
    fn query(&self) -> Self::Query;

    /// Skip `offset` documents and return at most `limit`. A `limit` of 0
    /// places no cap on the result.
    fn restrict_offset_limit(&self, query: Self::Query, offset: usize, limit: usize)
        -> Self::Query;

    /// Run a query, returning documents in query order
    fn execute(&self, query: &Self::Query) -> Result<Vec<Self::Item>>;

    /// Total number of documents in the collection.
    ///
    /// Pagination never calls this; has-more detection uses over-fetching.
    fn count_all(&self) -> Result<u64>;
}
