//! Per-collection pagination settings
//!
//! Each document type carries a compile-time default page size
//! ([`Document::PAGE_SIZE`]). Those defaults can be overridden at runtime,
//! one collection at a time, either directly or from a YAML settings file:
//!
//! ```yaml
//! collections:
//!   persons:
//!     page_size: 50
//!   legacy_events:
//!     page_size: 10
//!     coercion: lenient
//! ```
//!
//! Overrides are process-wide and read on every call that omits an explicit
//! limit. They are expected to be set at startup.

use crate::error::{Error, Result};
use crate::pagination::Coercion;
use crate::types::Document;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{LazyLock, PoisonError, RwLock};

/// Page size used by document types that do not declare their own
pub const DEFAULT_PAGE_SIZE: usize = 25;

static OVERRIDES: LazyLock<RwLock<HashMap<String, CollectionSettings>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

// ============================================================================
// Settings File
// ============================================================================

/// Settings for a single collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSettings {
    /// Default page size override
    #[serde(default)]
    pub page_size: Option<usize>,

    /// How textual page parameters are parsed
    #[serde(default)]
    pub coercion: Coercion,
}

/// Pagination settings loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// Settings keyed by collection name
    #[serde(default)]
    pub collections: HashMap<String, CollectionSettings>,
}

impl PaginationSettings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read settings file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Check that every configured page size is positive
    pub fn validate(&self) -> Result<()> {
        for (name, collection) in &self.collections {
            if collection.page_size == Some(0) {
                return Err(Error::config(format!(
                    "page_size for collection '{name}' must be a positive integer"
                )));
            }
        }
        Ok(())
    }

    /// Install these settings as the process-wide overrides
    pub fn apply(&self) -> Result<()> {
        self.validate()?;
        let mut overrides = OVERRIDES.write().unwrap_or_else(PoisonError::into_inner);
        for (name, collection) in &self.collections {
            tracing::debug!(
                collection = %name,
                page_size = ?collection.page_size,
                coercion = ?collection.coercion,
                "Applying pagination settings"
            );
            overrides.insert(name.clone(), collection.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Process-wide Overrides
// ============================================================================

/// Default page size for a document type
pub fn default_page_size<D: Document>() -> usize {
    page_size_for(D::COLLECTION).unwrap_or(D::PAGE_SIZE)
}

/// Override the default page size for a document type
pub fn set_default_page_size<D: Document>(page_size: usize) -> Result<()> {
    set_page_size_for(D::COLLECTION, page_size)
}

/// Coercion mode for a document type
pub fn coercion<D: Document>() -> Coercion {
    coercion_for(D::COLLECTION)
}

/// Runtime page size override for a collection, if any
pub fn page_size_for(collection: &str) -> Option<usize> {
    OVERRIDES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(collection)
        .and_then(|s| s.page_size)
}

/// Override the default page size for a collection by name
pub fn set_page_size_for(collection: &str, page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_input(
            "page_size",
            "0",
            "default page size must be a positive integer",
        ));
    }
    OVERRIDES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(collection.to_string())
        .or_default()
        .page_size = Some(page_size);
    Ok(())
}

/// Coercion mode for a collection by name
pub fn coercion_for(collection: &str) -> Coercion {
    OVERRIDES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(collection)
        .map(|s| s.coercion)
        .unwrap_or_default()
}

/// Set the coercion mode for a collection by name
pub fn set_coercion_for(collection: &str, coercion: Coercion) {
    OVERRIDES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(collection.to_string())
        .or_default()
        .coercion = coercion;
}

/// Drop all runtime overrides for a collection
pub fn reset(collection: &str) {
    OVERRIDES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(collection);
}
