//! Remote outages fall back to the cached mirror.

use assetry_client::RemoteStore;
use assetry_console::Refresh;
use assetry_core::{EntityId, EntityKind};
use assetry_core::model::{Asset, License};
use serde_json::json;

use crate::common::TestHarness;

#[tokio::test]
async fn test_failed_list_keeps_cached_collection() {
    let harness = TestHarness::new();
    harness.remote.seed(
        "licenses",
        [
            json!({"id": "l-1", "name": "Office", "seats": 10}),
            json!({"id": "l-2", "name": "IDE", "seats": 3}),
        ],
    );
    assert!(harness.console.refresh::<License>().await.is_fetched());
    let before = harness.console.list::<License>().await;

    harness.remote.set_available(false);
    let outcome = harness.console.refresh::<License>().await;
    assert!(matches!(outcome, Refresh::Cached { count: 2, .. }));
    assert_eq!(harness.console.list::<License>().await, before);

    let reopened = harness.reopen();
    assert_eq!(reopened.list::<License>().await, before);
}

#[tokio::test]
async fn test_refresh_all_falls_back_per_kind() {
    let harness = TestHarness::new();
    harness
        .remote
        .seed("assets", [json!({"id": "a-1", "name": "Laptop-01", "tag": "A-1001"})]);
    let outcomes = harness.console.refresh_all().await;
    assert_eq!(outcomes.len(), EntityKind::ALL.len());
    assert!(outcomes.iter().all(|(_, r)| r.is_fetched()));

    harness.remote.set_available(false);
    let outcomes = harness.console.refresh_all().await;
    assert!(outcomes.iter().all(|(_, r)| !r.is_fetched()));
    let assets = harness.console.list::<Asset>().await;
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].tag, "A-1001");
}

#[tokio::test]
async fn test_successful_list_replaces_mirror() {
    let harness = TestHarness::new();
    harness
        .remote
        .seed("licenses", [json!({"id": "l-1", "name": "Old"})]);
    harness.console.refresh::<License>().await;

    harness
        .remote
        .delete("licenses", &EntityId::new("l-1"))
        .await
        .unwrap();
    harness
        .remote
        .seed("licenses", [json!({"id": "l-9", "name": "New"})]);
    harness.console.refresh::<License>().await;

    let names: Vec<String> = harness
        .console
        .list::<License>()
        .await
        .into_iter()
        .map(|r| r.fields.name)
        .collect();
    assert_eq!(names, vec!["New"]);
}

#[tokio::test]
async fn test_create_while_offline_changes_nothing_locally() {
    let harness = TestHarness::new();
    harness.remote.set_available(false);
    let err = harness
        .console
        .create(Asset {
            name: "Dock".into(),
            tag: "D-1".into(),
            ..Asset::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert!(harness.console.list::<Asset>().await.is_empty());
}
