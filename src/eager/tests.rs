//! Tests for eager loading

use super::*;
use crate::collection::PaginatedCollection;
use crate::error::{Error, Result};
use crate::types::{DocumentId, JsonValue};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeSet;

const PERSON_RELATIONS: &[Relation] = &[
    Relation::new("group", "group_id", "groups"),
    Relation::new("manager", "manager_id", "persons"),
];

fn registry() -> RelationRegistry<'static> {
    RelationRegistry::new("persons", PERSON_RELATIONS)
}

/// Loader that serves fixed documents and records every call
#[derive(Default)]
struct RecordingLoader {
    documents: Vec<(String, RelatedDocument)>,
    calls: RefCell<Vec<(String, Vec<DocumentId>)>>,
    fail: bool,
}

impl RecordingLoader {
    fn with(mut self, collection: &str, id: &str) -> Self {
        self.documents.push((
            collection.to_string(),
            RelatedDocument {
                id: id.to_string(),
                body: json!({ "id": id }),
            },
        ));
        self
    }

    fn calls(&self) -> Vec<(String, Vec<DocumentId>)> {
        self.calls.borrow().clone()
    }
}

impl RelatedLoader for RecordingLoader {
    fn find_any_in(
        &self,
        collection: &str,
        ids: &BTreeSet<DocumentId>,
    ) -> Result<Vec<RelatedDocument>> {
        self.calls
            .borrow_mut()
            .push((collection.to_string(), ids.iter().cloned().collect()));
        if self.fail {
            return Err(Error::store("connection refused"));
        }
        Ok(self
            .documents
            .iter()
            .filter(|(c, d)| c == collection && ids.contains(&d.id))
            .map(|(_, d)| d.clone())
            .collect())
    }
}

fn page(items: Vec<JsonValue>) -> PaginatedCollection<JsonValue> {
    let len = items.len();
    PaginatedCollection::new(items, 0, len.max(1), false)
}

// ============================================================================
// Relation Tests
// ============================================================================

#[test]
fn test_relation_accessors() {
    let relation = Relation::new("group", "group_id", "groups");
    assert_eq!(relation.name(), "group");
    assert_eq!(relation.foreign_key(), "group_id");
    assert_eq!(relation.related(), "groups");
    assert_eq!(relation, Relation::owned("group", "group_id", "groups"));
}

#[test]
fn test_relation_from_str() {
    let relation: Relation = "group=group_id:groups".parse().unwrap();
    assert_eq!(relation, Relation::new("group", "group_id", "groups"));

    assert!("group".parse::<Relation>().is_err());
    assert!("group=group_id".parse::<Relation>().is_err());
    assert!("=group_id:groups".parse::<Relation>().is_err());
}

#[test]
fn test_registry_resolve_dedupes_in_order() {
    let resolved = registry().resolve(&["manager", "group", "manager"]).unwrap();
    let names: Vec<&str> = resolved.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["manager", "group"]);
}

#[test]
fn test_registry_unknown_relation() {
    let err = registry().resolve(&["groop"]).unwrap_err();
    match err {
        Error::UnknownRelation {
            collection,
            relation,
        } => {
            assert_eq!(collection, "persons");
            assert_eq!(relation, "groop");
        }
        other => panic!("Expected UnknownRelation, got {other:?}"),
    }
}

// ============================================================================
// IdentityMap Tests
// ============================================================================

#[test]
fn test_identity_map() {
    let mut cache = IdentityMap::new();
    assert!(cache.is_empty());

    cache.insert("groups", "g1".to_string(), json!({"id": "g1"}));
    cache.insert("groups", "g1".to_string(), json!({"id": "g1", "v": 2}));
    cache.insert("teams", "t1".to_string(), json!({"id": "t1"}));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.len_of("groups"), 1);
    assert_eq!(cache.get("groups", "g1"), Some(&json!({"id": "g1", "v": 2})));
    assert!(cache.contains("teams", "t1"));
    assert!(!cache.contains("teams", "g1"));

    cache.insert("groups", "g0".to_string(), json!({"id": "g0"}));
    let ids: Vec<&str> = cache.documents("groups").into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["g0", "g1"]);
    assert!(cache.documents("missing").is_empty());

    cache.clear();
    assert!(cache.is_empty());
}

// ============================================================================
// Prefetch Tests
// ============================================================================

#[test]
fn test_shared_foreign_key_issues_one_query() {
    let loader = RecordingLoader::default().with("groups", "g1");
    let page = page(vec![
        json!({"id": "p1", "group_id": "g1"}),
        json!({"id": "p2", "group_id": "g1"}),
    ]);
    let mut cache = IdentityMap::new();

    prefetch(&page, &["group"], &registry(), &loader, &mut cache).unwrap();

    assert_eq!(
        loader.calls(),
        vec![("groups".to_string(), vec!["g1".to_string()])]
    );
    assert!(cache.contains("groups", "g1"));
    assert_eq!(page.len(), 2);
}

#[test]
fn test_one_query_per_relation_regardless_of_page_size() {
    let loader = RecordingLoader::default()
        .with("groups", "g1")
        .with("groups", "g2")
        .with("persons", "boss");
    let items = (0..40)
        .map(|i| {
            let group = if i % 2 == 0 { "g1" } else { "g2" };
            json!({
                "id": format!("p{i}"),
                "group_id": group,
                "manager_id": "boss"
            })
        })
        .collect();
    let page = page(items);
    let mut cache = IdentityMap::new();

    prefetch(&page, &["group", "manager"], &registry(), &loader, &mut cache).unwrap();

    let calls = loader.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        ("groups".to_string(), vec!["g1".to_string(), "g2".to_string()])
    );
    assert_eq!(calls[1], ("persons".to_string(), vec!["boss".to_string()]));
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_null_foreign_keys_are_ignored() {
    let loader = RecordingLoader::default().with("groups", "g1");
    let page = page(vec![
        json!({"id": "p1", "group_id": null}),
        json!({"id": "p2"}),
        json!({"id": "p3", "group_id": "g1"}),
    ]);
    let mut cache = IdentityMap::new();

    prefetch(&page, &["group"], &registry(), &loader, &mut cache).unwrap();

    assert_eq!(
        loader.calls(),
        vec![("groups".to_string(), vec!["g1".to_string()])]
    );
}

#[test]
fn test_no_foreign_keys_means_no_query() {
    let loader = RecordingLoader::default();
    let page = page(vec![json!({"id": "p1"}), json!({"id": "p2", "group_id": null})]);
    let mut cache = IdentityMap::new();

    prefetch(&page, &["group"], &registry(), &loader, &mut cache).unwrap();

    assert!(loader.calls().is_empty());
    assert!(cache.is_empty());
}

#[test]
fn test_empty_page_is_noop() {
    let loader = RecordingLoader::default();
    let page: PaginatedCollection<JsonValue> = PaginatedCollection::new(vec![], 0, 10, false);
    let mut cache = IdentityMap::new();

    prefetch(&page, &["group"], &registry(), &loader, &mut cache).unwrap();

    assert!(loader.calls().is_empty());
}

#[test]
fn test_unknown_relation_fails_before_any_query() {
    let loader = RecordingLoader::default().with("groups", "g1");
    let page = page(vec![json!({"id": "p1", "group_id": "g1"})]);
    let mut cache = IdentityMap::new();

    let err = prefetch(&page, &["group", "groop"], &registry(), &loader, &mut cache).unwrap_err();

    assert!(matches!(err, Error::UnknownRelation { .. }));
    assert!(loader.calls().is_empty());
    assert!(cache.is_empty());
}

#[test]
fn test_unknown_relation_fails_on_empty_page_too() {
    let loader = RecordingLoader::default();
    let page: PaginatedCollection<JsonValue> = PaginatedCollection::new(vec![], 0, 10, false);
    let mut cache = IdentityMap::new();

    assert!(prefetch(&page, &["groop"], &registry(), &loader, &mut cache).is_err());
}

#[test]
fn test_loader_failure_propagates_and_leaves_cache_untouched() {
    let loader = RecordingLoader {
        fail: true,
        ..RecordingLoader::default()
    };
    let page = page(vec![json!({"id": "p1", "group_id": "g1"})]);
    let mut cache = IdentityMap::new();

    let err = prefetch(&page, &["group"], &registry(), &loader, &mut cache).unwrap_err();

    assert!(matches!(err, Error::Store { .. }));
    assert!(cache.is_empty());
}

#[test]
fn test_missing_related_documents_are_tolerated() {
    let loader = RecordingLoader::default().with("groups", "g1");
    let page = page(vec![
        json!({"id": "p1", "group_id": "g1"}),
        json!({"id": "p2", "group_id": "gone"}),
    ]);
    let mut cache = IdentityMap::new();

    prefetch(&page, &["group"], &registry(), &loader, &mut cache).unwrap();

    assert!(cache.contains("groups", "g1"));
    assert!(!cache.contains("groups", "gone"));
}
