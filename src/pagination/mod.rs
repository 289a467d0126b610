//! Pagination module
//!
//! Turns loosely-typed page requests into a normalized offset/limit window.
//!
//! # Overview
//!
//! Callers describe the page they want with a [`PageSpec`]: a page number,
//! an offset, and a limit, each given as an integer or a numeric string.
//! The resolver normalizes that into a [`PageWindow`]:
//!
//! - `limit` is the explicit limit, or the collection's default page size
//! - a positive `page` wins over `offset` entirely: `offset = (page - 1) * limit`
//! - otherwise a non-negative `offset` is used as-is
//! - otherwise the window starts at 0

mod resolver;
mod types;

pub use resolver::{coerce, resolve, resolve_limit};
pub use types::{Coercion, PageParam, PageSpec, PageWindow};
