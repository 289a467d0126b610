//! Common types used throughout pagewise
//!
//! This module contains shared type aliases, the `Document` trait that
//! typed entities implement, and the `ForeignKeys` lookup used by eager
//! loading.

use crate::eager::Relation;
use crate::settings::DEFAULT_PAGE_SIZE;
use serde::de::DeserializeOwned;
use serde::Serialize;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Document identifier as stored in the backing collection
pub type DocumentId = String;

// ============================================================================
// Document
// ============================================================================

/// A typed entity stored in a document collection.
///
/// Implementing this trait is what attaches pagination to a type: a store
/// hands out a [`QueryableCollection`](crate::query::QueryableCollection)
/// for it, and that collection gets `paginate`, `restrict_page` and
/// `per_page` through [`Paginate`](crate::query::Paginate).
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Person {
///     id: String,
///     group_id: Option<String>,
/// }
///
/// impl Document for Person {
///     const COLLECTION: &'static str = "persons";
///     const PAGE_SIZE: usize = 50;
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn relations() -> &'static [Relation] {
///         const RELATIONS: &[Relation] = &[Relation::new("group", "group_id", "groups")];
///         RELATIONS
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Clone {
    /// Name of the collection documents of this type live in
    const COLLECTION: &'static str;

    /// Compile-time default page size; can be overridden at runtime through
    /// [`settings::set_default_page_size`](crate::settings::set_default_page_size)
    const PAGE_SIZE: usize = DEFAULT_PAGE_SIZE;

    /// Identifier of this document
    fn id(&self) -> &str;

    /// Relations this type can eager load
    fn relations() -> &'static [Relation] {
        &[]
    }

    /// Foreign key value stored in `field`, if any.
    ///
    /// The default reads the field from the serialized document.
    fn foreign_key(&self, field: &str) -> Option<DocumentId> {
        let value = serde_json::to_value(self).ok()?;
        value.get(field).and_then(json_to_id)
    }
}

// ============================================================================
// Foreign Keys
// ============================================================================

/// Anything a foreign key can be read from
pub trait ForeignKeys {
    /// Foreign key value stored in `field`; `None` when absent or null
    fn foreign_key(&self, field: &str) -> Option<DocumentId>;
}

impl<D: Document> ForeignKeys for D {
    fn foreign_key(&self, field: &str) -> Option<DocumentId> {
        Document::foreign_key(self, field)
    }
}

impl ForeignKeys for JsonValue {
    fn foreign_key(&self, field: &str) -> Option<DocumentId> {
        self.get(field).and_then(json_to_id)
    }
}

/// Convert a JSON value to a document id: non-empty strings as-is,
/// numbers stringified, anything else absent
pub(crate) fn json_to_id(value: &JsonValue) -> Option<DocumentId> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
