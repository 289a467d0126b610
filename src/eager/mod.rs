//! Eager loading
//!
//! Avoids N+1 lookups when a page of documents references other documents.
//!
//! # Overview
//!
//! - [`Relation`] / [`RelationRegistry`] - which foreign key field of a
//!   collection points at which related collection
//! - [`RelatedLoader`] - store capability to fetch many documents by id in
//!   one round trip
//! - [`IdentityMap`] - cache the prefetched documents land in
//! - [`prefetch`] - one batched lookup per requested relation for a page

mod cache;
mod prefetch;
mod relation;

pub use cache::IdentityMap;
pub use prefetch::{prefetch, RelatedDocument, RelatedLoader};
pub use relation::{Relation, RelationRegistry};

#[cfg(test)]
mod tests;
