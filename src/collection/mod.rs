//! Paginated collection
//!
//! A page of documents together with the metadata needed to request the
//! next one: where this page started, how large it was allowed to be, and
//! whether the store held more documents past its end.

mod paginated;

pub use paginated::{PageMeta, PaginatedCollection};
