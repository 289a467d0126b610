//! Query module
//!
//! The seam between pagination and whatever store holds the documents.
//!
//! # Overview
//!
//! - [`QueryableCollection`] - what a store must provide: an unrestricted
//!   query, offset/limit restriction, and execution
//! - [`restrict`] - applies a [`PageWindow`](crate::pagination::PageWindow) to a query
//! - [`overfetch`] / [`execute_page`] - run a window with one extra document
//!   to learn whether another page exists, without a count query
//! - [`Paginate`] - `paginate`, `restrict_page` and `per_page` for every
//!   queryable collection

mod collection;
mod executor;
mod paginate;

pub use collection::QueryableCollection;
pub use executor::{execute_page, overfetch, restrict};
pub use paginate::Paginate;
