// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Pagewise
//!
//! Offset/limit pagination for document collections, with single-query
//! "has more" detection and batched eager loading of related documents.
//!
//! ## Features
//!
//! - **Page arithmetic**: `page`, `offset` and `limit` parameters, numeric or
//!   textual, resolved to a concrete window
//! - **Over-fetch execution**: one read of `limit + 1` documents tells whether
//!   another page exists, without a count query
//! - **Paginated collections**: pages carry their offset, page size and
//!   `has_more_results` flag
//! - **Eager loading**: one batched lookup per requested relation, results
//!   cached in an identity map
//! - **Per-collection defaults**: default page sizes configurable per
//!   collection at runtime or from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::{MemoryStore, PageSpec, Paginate, Result};
//!
//! fn first_page(store: &MemoryStore) -> Result<()> {
//!     let persons = store.collection::<Person>();
//!     let page = persons.paginate(&PageSpec::new().with_page(1).with_limit(20))?;
//!
//!     for person in &page {
//!         println!("{}", person.name);
//!     }
//!     if let Some(next) = page.next_offset() {
//!         println!("next page starts at {next}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 Paginate (any QueryableCollection)            │
//! │  restrict_page()   per_page()   paginate()   paginate_eager() │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────┬────────────────┴──┬──────────────┬──────────────┐
//! │ Pagination  │    Executor       │    Eager     │    Store     │
//! ├─────────────┼───────────────────┼──────────────┼──────────────┤
//! │ PageSpec    │ limit + 1 fetch   │ Relations    │ Memory       │
//! │ PageWindow  │ has_more_results  │ find_any_in  │ DuckDB       │
//! │ Coercion    │ PaginatedColl.    │ IdentityMap  │              │
//! └─────────────┴───────────────────┴──────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Page parameter resolution
pub mod pagination;

/// Per-collection pagination settings
pub mod settings;

/// Paginated result pages
pub mod collection;

/// Queryable collections and the over-fetch executor
pub mod query;

/// Batched eager loading of related documents
pub mod eager;

/// Document stores
pub mod store;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use collection::{PageMeta, PaginatedCollection};
pub use eager::{IdentityMap, RelatedLoader, Relation};
pub use pagination::{Coercion, PageParam, PageSpec, PageWindow};
pub use query::{Paginate, QueryableCollection};
pub use settings::{PaginationSettings, DEFAULT_PAGE_SIZE};
pub use store::{CollectionDef, DuckDbStore, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
