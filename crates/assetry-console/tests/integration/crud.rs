//! Create, edit and delete through forms and the console.

use assetry_console::{Deletion, FormController, Submitted};
use assetry_core::model::{Asset, License, Person};
use assetry_core::{EntityId, Patch};

use crate::common::TestHarness;

#[tokio::test]
async fn test_asset_cost_edit_moves_total_value_exactly() {
    let harness = TestHarness::new();
    let console = &harness.console;
    let baseline = console.dashboard().await.total_value;

    let mut form = FormController::<Asset>::create();
    form.set("name", "Laptop-01").unwrap();
    form.set("tag", "A-1001").unwrap();
    let Submitted::Created(created) = form.submit(console).await.unwrap() else {
        unreachable!("create form must create");
    };
    assert_eq!(console.dashboard().await.total_value, baseline);

    let mut edit = FormController::edit(created.clone());
    edit.set("purchaseCost", 1200.0).unwrap();
    assert_eq!(
        edit.submit(console).await.unwrap(),
        Submitted::Updated(created.id.clone())
    );
    assert_eq!(console.dashboard().await.total_value, baseline + 1200.0);
    assert_eq!(console.financial().await.asset_value, 1200.0);
}

#[tokio::test]
async fn test_created_record_survives_restart() {
    let harness = TestHarness::new();
    let created = harness
        .console
        .create(License {
            name: "Office".into(),
            seats: 25,
            available_seats: 20,
            ..License::default()
        })
        .await
        .unwrap();

    harness.remote.set_available(false);
    let reopened = harness.reopen();
    let cached = reopened.get::<License>(&created.id).await.unwrap();
    assert_eq!(cached.seats, 25);
    assert_eq!(cached.created_at, created.created_at);
}

#[tokio::test]
async fn test_validation_failure_sends_nothing_and_keeps_draft() {
    let harness = TestHarness::new();
    let mut form = FormController::<Person>::create();
    form.set("firstName", "Grace").unwrap();
    form.set("lastName", "Hopper").unwrap();
    form.set("username", "ghopper").unwrap();

    let err = form.submit(&harness.console).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field(), Some("email"));
    assert!(form.is_open());
    assert_eq!(form.draft().username, "ghopper");
    assert_eq!(harness.calls(), 0);
}

#[tokio::test]
async fn test_declined_delete_performs_no_remote_call() {
    let harness = TestHarness::new();
    let created = harness
        .console
        .create(License {
            name: "CAD".into(),
            ..License::default()
        })
        .await
        .unwrap();

    let before = harness.calls();
    let outcome = harness
        .console
        .delete::<License>(&created.id, &false)
        .await
        .unwrap();
    assert_eq!(outcome, Deletion::Declined);
    assert_eq!(harness.calls(), before);
    assert_eq!(harness.remote.rows("licenses").len(), 1);
}

#[tokio::test]
async fn test_confirmed_delete_removes_everywhere() {
    let harness = TestHarness::new();
    let created = harness
        .console
        .create(License {
            name: "CAD".into(),
            ..License::default()
        })
        .await
        .unwrap();

    let outcome = harness
        .console
        .delete::<License>(&created.id, &true)
        .await
        .unwrap();
    assert_eq!(outcome, Deletion::Deleted);
    assert!(harness.remote.rows("licenses").is_empty());
    assert!(harness.console.list::<License>().await.is_empty());
    assert!(harness.reopen().list::<License>().await.is_empty());
}

#[tokio::test]
async fn test_unknown_patch_field_is_rejected_before_sending() {
    let harness = TestHarness::new();
    let before = harness.calls();
    let err = harness
        .console
        .update(
            &EntityId::new("l-1"),
            &Patch::<License>::new().set("seatColour", "blue"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("seatColour"));
    assert_eq!(harness.calls(), before);
}
