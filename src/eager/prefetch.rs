//! Batched prefetching of related documents

use super::cache::IdentityMap;
use super::relation::RelationRegistry;
use crate::collection::PaginatedCollection;
use crate::error::Result;
use crate::types::{DocumentId, ForeignKeys, JsonValue};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A document fetched by id from a related collection
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedDocument {
    /// Document id
    pub id: DocumentId,
    /// Raw document body
    pub body: JsonValue,
}

/// Store capability: fetch every document of a collection whose id is in a set
pub trait RelatedLoader {
    /// Fetch all documents in `collection` whose id is in `ids`, in one
    /// round trip. Ids with no matching document are simply absent from
    /// the result.
    fn find_any_in(
        &self,
        collection: &str,
        ids: &BTreeSet<DocumentId>,
    ) -> Result<Vec<RelatedDocument>>;
}

/// Warm `cache` with the documents the page's items reference through
/// each named relation.
///
/// Issues exactly one [`RelatedLoader::find_any_in`] call per distinct
/// relation that has at least one foreign key on the page. Every name is
/// checked against `registry` before anything is fetched, so an unknown
/// relation fails the call without touching the store. The cache is only
/// written once every lookup has succeeded.
pub fn prefetch<T, L, S>(
    page: &PaginatedCollection<T>,
    relations: &[S],
    registry: &RelationRegistry<'_>,
    loader: &L,
    cache: &mut IdentityMap,
) -> Result<()>
where
    T: ForeignKeys,
    L: RelatedLoader + ?Sized,
    S: AsRef<str>,
{
    let relations = registry.resolve(relations)?;
    if page.is_empty() || relations.is_empty() {
        return Ok(());
    }

    let mut fetched: Vec<(&str, Vec<RelatedDocument>)> = Vec::with_capacity(relations.len());
    for relation in relations {
        let ids: BTreeSet<DocumentId> = page
            .iter()
            .filter_map(|item| item.foreign_key(relation.foreign_key()))
            .collect();

        if ids.is_empty() {
            debug!(
                collection = registry.collection(),
                relation = relation.name(),
                "No foreign keys on page, skipping prefetch"
            );
            continue;
        }

        let documents = loader.find_any_in(relation.related(), &ids)?;
        debug!(
            collection = registry.collection(),
            relation = relation.name(),
            related = relation.related(),
            requested = ids.len(),
            found = documents.len(),
            "Prefetched related documents"
        );
        if documents.len() < ids.len() {
            warn!(
                "Relation '{}' on '{}' references {} missing document(s) in '{}'",
                relation.name(),
                registry.collection(),
                ids.len() - documents.len(),
                relation.related()
            );
        }

        fetched.push((relation.related(), documents));
    }

    for (collection, documents) in fetched {
        for document in documents {
            cache.insert(collection, document.id, document.body);
        }
    }

    Ok(())
}
