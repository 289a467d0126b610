//! Pagination types
//!
//! Defines the page request, its raw parameters and the resolved window.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw pagination parameter, as supplied by a caller
///
/// Query strings and form posts hand us text, typed callers hand us numbers;
/// both are accepted and coerced during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageParam {
    /// Integer value
    Int(i64),
    /// Textual value, expected to hold an integer
    Text(String),
}

impl fmt::Display for PageParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for PageParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PageParam {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for PageParam {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for PageParam {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for PageParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PageParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// How textual parameters are turned into integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    /// Reject anything that is not a whole integer, and reject explicit
    /// limits of zero or less
    #[default]
    Strict,
    /// Legacy permissive parsing: take the leading integer of a string,
    /// treat non-numeric text as 0, and fall back to the default page size
    /// when an explicit limit is zero or less
    Lenient,
}

/// A page request
///
/// All fields are optional; an empty spec resolves to the first page with
/// the default page size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    /// 1-based page number; takes precedence over `offset` when positive
    #[serde(default)]
    pub page: Option<PageParam>,
    /// Number of documents to skip
    #[serde(default)]
    pub offset: Option<PageParam>,
    /// Maximum number of documents on the page
    #[serde(default)]
    pub limit: Option<PageParam>,
}

impl PageSpec {
    /// Create an empty page spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a page by number
    pub fn with_page(mut self, page: impl Into<PageParam>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Request a page by offset
    pub fn with_offset(mut self, offset: impl Into<PageParam>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Set the page size
    pub fn with_limit(mut self, limit: impl Into<PageParam>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Resolve into a window using strict coercion
    pub fn resolve(&self, default_limit: usize) -> Result<PageWindow> {
        super::resolve(self, default_limit, Coercion::Strict)
    }
}

/// A resolved offset/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    /// Number of documents skipped
    pub offset: usize,
    /// Page size; 0 means uncapped
    pub limit: usize,
}

impl PageWindow {
    /// Create a window
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// The first page of the given size
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// Whether this window places no cap on the number of documents
    pub fn is_uncapped(&self) -> bool {
        self.limit == 0
    }

    /// Limit to request from the store so one extra document reveals
    /// whether another page exists
    pub fn overfetch_limit(&self) -> usize {
        if self.is_uncapped() {
            0
        } else {
            self.limit.saturating_add(1)
        }
    }

    /// Offset of the window that follows this one
    pub fn next_offset(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    /// 1-based page number, `None` for uncapped windows
    pub fn page_number(&self) -> Option<usize> {
        (self.limit > 0).then(|| self.offset / self.limit + 1)
    }
}
