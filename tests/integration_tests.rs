//! Integration tests over the in-memory store
//!
//! Tests the full flow: typed documents → page spec → paginated collection →
//! eager loaded relations

use pagewise::store::QueryRecord;
use pagewise::{
    settings, Document, Error, IdentityMap, MemoryStore, PageSpec, Paginate, PaginationSettings,
    Relation,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Person {
    id: String,
    name: String,
    group_id: Option<String>,
}

impl Document for Person {
    const COLLECTION: &'static str = "it_persons";

    fn id(&self) -> &str {
        &self.id
    }

    fn relations() -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[Relation::new("group", "group_id", "it_groups")];
        RELATIONS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Group {
    id: String,
    name: String,
}

impl Document for Group {
    const COLLECTION: &'static str = "it_groups";

    fn id(&self) -> &str {
        &self.id
    }
}

fn store_with_people(count: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for (id, name) in [("g1", "Admins"), ("g2", "Users")] {
        store
            .insert(&Group {
                id: id.to_string(),
                name: name.to_string(),
            })
            .unwrap();
    }
    for i in 1..=count {
        let group_id = match i % 3 {
            0 => None,
            1 => Some("g1".to_string()),
            _ => Some("g2".to_string()),
        };
        store
            .insert(&Person {
                id: format!("p{i}"),
                name: format!("Person {i}"),
                group_id,
            })
            .unwrap();
    }
    store.clear_log();
    store
}

// ============================================================================
// Paging Tests
// ============================================================================

#[test]
fn test_default_page_size_and_next_page() {
    let store = store_with_people(30);
    let persons = store.collection::<Person>();

    let first = persons.paginate(&PageSpec::new()).unwrap();
    assert_eq!(first.len(), 25);
    assert_eq!(first.current_page_size(), 25);
    assert!(first.has_more_results());
    assert_eq!(first.next_offset(), Some(25));

    let second = persons
        .paginate(&PageSpec::new().with_offset(first.next_offset_at()))
        .unwrap();
    assert_eq!(second.len(), 5);
    assert!(!second.has_more_results());
    assert_eq!(second.items()[0].name, "Person 26");
}

#[test]
fn test_query_string_parameters() {
    let store = store_with_people(30);
    let persons = store.collection::<Person>();

    let spec: PageSpec =
        serde_json::from_str(r#"{"page": "3", "limit": "10", "offset": "4"}"#).unwrap();
    let page = persons.paginate(&spec).unwrap();

    assert_eq!(page.current_offset(), 20);
    assert_eq!(page.page_number(), Some(3));
    assert_eq!(page.len(), 10);
    assert!(!page.has_more_results());
}

#[test]
fn test_bad_parameters_are_rejected_before_reading() {
    let store = store_with_people(5);
    let persons = store.collection::<Person>();

    for spec in [
        PageSpec::new().with_limit(0),
        PageSpec::new().with_limit(-3),
        PageSpec::new().with_offset("abc"),
        PageSpec::new().with_page("1.5"),
    ] {
        let err = persons.paginate(&spec).unwrap_err();
        assert!(
            matches!(err, Error::InvalidPaginationInput { .. }),
            "unexpected error for {spec:?}: {err}"
        );
    }
    assert!(store.query_log().is_empty());
}

#[test]
fn test_page_serializes_with_meta() {
    let store = store_with_people(3);
    let page = store
        .collection::<Person>()
        .paginate(&PageSpec::new().with_limit(2))
        .unwrap();

    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(value["items"][1]["id"], "p2");
    assert_eq!(
        value["meta"],
        serde_json::json!({
            "offset": 0,
            "page_size": 2,
            "has_more": true,
            "next_offset": 2,
            "page_number": 1,
        })
    );
}

// ============================================================================
// Eager Loading Tests
// ============================================================================

#[test]
fn test_eager_load_groups_for_a_page() {
    let store = store_with_people(40);
    let mut cache = IdentityMap::new();

    let page = store
        .collection::<Person>()
        .paginate_eager(&PageSpec::new(), &["group"], &store, &mut cache)
        .unwrap();

    let lookups: Vec<QueryRecord> = store
        .query_log()
        .into_iter()
        .filter(|r| matches!(r, QueryRecord::FindAnyIn { .. }))
        .collect();
    assert_eq!(lookups.len(), 1);

    for person in &page {
        if let Some(group_id) = &person.group_id {
            let group: Group = cache.get_as(group_id).unwrap().unwrap();
            assert_eq!(&group.id, group_id);
        }
    }
}

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_settings_file_changes_page_size() {
    let store = MemoryStore::new();
    for i in 1..=12 {
        store
            .insert(&Group {
                id: format!("g{i}"),
                name: format!("Group {i}"),
            })
            .unwrap();
    }
    let groups = store.collection::<Group>();

    let config = PaginationSettings::from_yaml_str(
        "collections:\n  it_groups:\n    page_size: 5\n    coercion: lenient\n",
    )
    .unwrap();
    config.apply().unwrap();

    let page = groups.paginate(&PageSpec::new().with_page("2nd")).unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(page.items()[0].name, "Group 6");
    assert_eq!(settings::default_page_size::<Group>(), 5);

    settings::reset(Group::COLLECTION);
    assert_eq!(settings::default_page_size::<Group>(), 25);
}
