//! CLI commands and argument parsing

use crate::eager::Relation;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginate document collections stored in DuckDB
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// DuckDB database file holding the documents
    #[arg(short, long, global = true, default_value = "pagewise.duckdb")]
    pub db: PathBuf,

    /// Pagination settings file (YAML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import documents from a JSON array or JSON lines file
    Import {
        /// Collection to import into
        collection: String,

        /// File to read
        file: PathBuf,

        /// Field holding each document's id
        #[arg(long, default_value = "id")]
        id_field: String,
    },

    /// Print one page of a collection
    Page {
        /// Collection to page through
        collection: String,

        /// 1-based page number (takes precedence over --offset)
        #[arg(long)]
        page: Option<String>,

        /// Number of documents to skip
        #[arg(long)]
        offset: Option<String>,

        /// Documents per page (defaults to the collection's page size)
        #[arg(long)]
        limit: Option<String>,

        /// Relation to eager load, as name=foreign_key:collection
        /// (repeatable)
        #[arg(short, long)]
        include: Vec<Relation>,
    },

    /// Count the documents in a collection
    Count {
        /// Collection to count
        collection: String,
    },

    /// List collection names
    Collections,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
