//! `PaginatedCollection` and its metadata

use crate::pagination::PageWindow;
use serde::{Serialize, Serializer};
use std::ops::Deref;

/// An ordered page of documents plus pagination metadata.
///
/// Built once by the over-fetch executor and handed to the caller; it is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedCollection<D> {
    items: Vec<D>,
    current_offset: usize,
    current_page_size: usize,
    has_more_results: bool,
}

/// Serializable summary of a page's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Offset this page started at
    pub offset: usize,
    /// Page size used to produce this page
    pub page_size: usize,
    /// Whether documents exist past the end of this page
    pub has_more: bool,
    /// Offset of the next page, present only when `has_more`
    pub next_offset: Option<usize>,
    /// 1-based page number, absent for uncapped pages
    pub page_number: Option<usize>,
}

impl<D> PaginatedCollection<D> {
    /// Create a page from its items and metadata
    pub fn new(items: Vec<D>, offset: usize, page_size: usize, has_more_results: bool) -> Self {
        debug_assert!(page_size == 0 || items.len() <= page_size);
        Self {
            items,
            current_offset: offset,
            current_page_size: page_size,
            has_more_results,
        }
    }

    /// Create a page from a resolved window
    pub fn from_window(items: Vec<D>, window: PageWindow, has_more_results: bool) -> Self {
        Self::new(items, window.offset, window.limit, has_more_results)
    }

    /// An empty page with no further results
    pub fn empty(window: PageWindow) -> Self {
        Self::from_window(Vec::new(), window, false)
    }

    /// Documents on this page, in query order
    pub fn items(&self) -> &[D] {
        &self.items
    }

    /// Take ownership of the documents
    pub fn into_items(self) -> Vec<D> {
        self.items
    }

    /// Offset used to produce this page
    pub fn current_offset(&self) -> usize {
        self.current_offset
    }

    /// Page size used to produce this page
    pub fn current_page_size(&self) -> usize {
        self.current_page_size
    }

    /// Whether the store held more documents past this page
    pub fn has_more_results(&self) -> bool {
        self.has_more_results
    }

    /// Offset directly after this page, whether or not anything is there
    pub fn next_offset_at(&self) -> usize {
        self.window().next_offset()
    }

    /// Offset of the next page, if there is one
    pub fn next_offset(&self) -> Option<usize> {
        self.has_more_results.then(|| self.next_offset_at())
    }

    /// 1-based page number.
    ///
    /// `None` when the page size is 0 (uncapped), where a page number has
    /// no meaning.
    pub fn page_number(&self) -> Option<usize> {
        self.window().page_number()
    }

    /// The window this page was produced from
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.current_offset, self.current_page_size)
    }

    /// Metadata summary
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            offset: self.current_offset,
            page_size: self.current_page_size,
            has_more: self.has_more_results,
            next_offset: self.next_offset(),
            page_number: self.page_number(),
        }
    }

    /// Iterate over the documents
    pub fn iter(&self) -> std::slice::Iter<'_, D> {
        self.items.iter()
    }

    /// Transform every document, keeping the metadata
    pub fn map<U, F: FnMut(D) -> U>(self, f: F) -> PaginatedCollection<U> {
        PaginatedCollection {
            items: self.items.into_iter().map(f).collect(),
            current_offset: self.current_offset,
            current_page_size: self.current_page_size,
            has_more_results: self.has_more_results,
        }
    }
}

impl<D> Deref for PaginatedCollection<D> {
    type Target = [D];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<D> IntoIterator for PaginatedCollection<D> {
    type Item = D;
    type IntoIter = std::vec::IntoIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, D> IntoIterator for &'a PaginatedCollection<D> {
    type Item = &'a D;
    type IntoIter = std::slice::Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<D: Serialize> Serialize for PaginatedCollection<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Page<'a, D> {
            items: &'a [D],
            meta: PageMeta,
        }

        Page {
            items: &self.items,
            meta: self.meta(),
        }
        .serialize(serializer)
    }
}
