//! DuckDB integration tests
//!
//! Pages through documents persisted in a DuckDB file, the way the CLI does.

use pagewise::store::CollectionDef;
use pagewise::{DuckDbStore, IdentityMap, PageSpec, Paginate, QueryableCollection, Relation};
use pretty_assertions::assert_eq;
use serde_json::json;

fn seeded_store(path: &std::path::Path) -> DuckDbStore {
    let store = DuckDbStore::open(path).unwrap();
    store
        .insert_raw("db_teams", "t1", &json!({"id": "t1", "name": "Core"}))
        .unwrap();
    store
        .insert_raw("db_teams", "t2", &json!({"id": "t2", "name": "Infra"}))
        .unwrap();
    for i in 1..=9 {
        let team = if i <= 4 { "t1" } else { "t2" };
        store
            .insert_raw(
                "db_players",
                &format!("p{i}"),
                &json!({"id": format!("p{i}"), "team_id": team}),
            )
            .unwrap();
    }
    store
}

#[test]
fn test_walk_pages_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("league.duckdb");
    drop(seeded_store(&path));

    let store = DuckDbStore::open(&path).unwrap();
    let players = store.raw_collection(CollectionDef::named("db_players").with_page_size(4));

    let mut seen = Vec::new();
    let mut spec = PageSpec::new();
    loop {
        let page = players.paginate(&spec).unwrap();
        seen.extend(page.iter().map(|p| p["id"].as_str().unwrap_or_default().to_string()));
        match page.next_offset() {
            Some(next) => spec = PageSpec::new().with_offset(next),
            None => break,
        }
    }

    let expected: Vec<String> = (1..=9).map(|i| format!("p{i}")).collect();
    assert_eq!(seen, expected);
    assert_eq!(players.count_all().unwrap(), 9);
}

#[test]
fn test_eager_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir.path().join("league.duckdb"));

    let players = store.raw_collection(
        CollectionDef::named("db_players")
            .with_relations(vec![Relation::owned("team", "team_id", "db_teams")]),
    );
    let mut cache = IdentityMap::new();

    let page = players
        .paginate_eager(
            &PageSpec::new().with_page(2).with_limit(3),
            &["team"],
            &store,
            &mut cache,
        )
        .unwrap();

    let ids: Vec<&str> = page.iter().filter_map(|p| p["id"].as_str()).collect();
    assert_eq!(ids, vec!["p4", "p5", "p6"]);
    assert!(page.has_more_results());
    assert_eq!(cache.len_of("db_teams"), 2);
    assert_eq!(cache.get("db_teams", "t2").map(|t| &t["name"]), Some(&json!("Infra")));
}
