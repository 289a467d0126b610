//! CLI module
//!
//! Command-line interface over a DuckDB document store.
//!
//! # Commands
//!
//! - `import` - Load documents from a JSON or JSON lines file
//! - `page` - Print one page of a collection, optionally eager loading relations
//! - `count` - Count the documents in a collection
//! - `collections` - List collection names

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_documents, Runner};
