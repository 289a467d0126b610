//! Collection definitions shared by the stores

use crate::eager::Relation;
use crate::settings::DEFAULT_PAGE_SIZE;
use crate::types::Document;
use std::borrow::Cow;

/// Name, default page size and relations of a collection handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDef {
    name: Cow<'static, str>,
    page_size: usize,
    relations: Cow<'static, [Relation]>,
}

impl CollectionDef {
    /// Definition declared by a document type
    pub fn of<D: Document>() -> Self {
        Self {
            name: Cow::Borrowed(D::COLLECTION),
            page_size: D::PAGE_SIZE,
            relations: Cow::Borrowed(D::relations()),
        }
    }

    /// Definition for an untyped collection
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            page_size: DEFAULT_PAGE_SIZE,
            relations: Cow::Borrowed(&[]),
        }
    }

    /// Set the default page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the relations
    pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
        self.relations = Cow::Owned(relations);
        self
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Relations
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }
}
