//! Alert and policy violation transitions.

use assetry_console::Filter;
use assetry_core::model::{Alert, AlertStatus, PolicyViolation, ViolationStatus};
use assetry_core::{EntityId, Facet, Phase, Transition};

use crate::common::TestHarness;

async fn raise(harness: &TestHarness, title: &str) -> EntityId {
    harness
        .console
        .create(Alert {
            title: title.into(),
            message: "Threshold crossed".into(),
            category: "Hardware".into(),
            ..Alert::default()
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_resolved_alert_moves_between_filters() {
    let harness = TestHarness::new();
    let id = raise(&harness, "Disk usage 95%").await;

    let phase = harness
        .console
        .transition::<Alert>(&id, Transition::Resolve)
        .await
        .unwrap();
    assert_eq!(phase, Phase::Resolved);

    let alerts = harness.console.list::<Alert>().await;
    assert_eq!(alerts[0].status, AlertStatus::Resolved);
    assert!(alerts[0].resolved_at.is_some());

    let active = Filter::new().facet(Facet::Status, "active");
    let resolved = Filter::new().facet(Facet::Status, "resolved");
    assert_eq!(active.apply(&alerts).count(), 0);
    assert_eq!(resolved.apply(&alerts).count(), 1);

    assert_eq!(harness.remote.rows("alerts")[0]["status"], "resolved");
    assert_eq!(harness.console.dashboard().await.active_alerts, 0);
}

#[tokio::test]
async fn test_disallowed_transition_makes_no_call() {
    let harness = TestHarness::new();
    let id = raise(&harness, "Backup failed").await;
    harness
        .console
        .transition::<Alert>(&id, Transition::Dismiss)
        .await
        .unwrap();

    let before = harness.calls();
    let err = harness
        .console
        .transition::<Alert>(&id, Transition::Acknowledge)
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_core(),
        Some(assetry_core::Error::InvalidTransition { .. })
    ));
    assert_eq!(harness.calls(), before);
}

#[tokio::test]
async fn test_acknowledge_then_resolve() {
    let harness = TestHarness::new();
    let id = raise(&harness, "Fan noise").await;
    harness
        .console
        .transition::<Alert>(&id, Transition::Acknowledge)
        .await
        .unwrap();
    let alert = harness.console.get::<Alert>(&id).await.unwrap();
    assert_eq!(alert.status, AlertStatus::Acknowledged);
    assert!(alert.acknowledged_at.is_some());

    harness
        .console
        .transition::<Alert>(&id, Transition::Resolve)
        .await
        .unwrap();
    assert_eq!(
        harness.console.get::<Alert>(&id).await.unwrap().status,
        AlertStatus::Resolved
    );
}

#[tokio::test]
async fn test_bulk_transition_reports_run_and_logs_failures() {
    let harness = TestHarness::new();
    let first = raise(&harness, "One").await;
    let second = raise(&harness, "Two").await;
    harness
        .console
        .transition::<Alert>(&second, Transition::Resolve)
        .await
        .unwrap();

    let ids = vec![first.clone(), second.clone(), EntityId::new("al-missing")];
    let outcome = harness
        .console
        .bulk_transition::<Alert>(&ids, Transition::Dismiss)
        .await;
    assert_eq!(outcome.attempted, 3);
    assert_eq!(
        harness.console.get::<Alert>(&first).await.unwrap().status,
        AlertStatus::Dismissed
    );
    assert_eq!(
        harness.console.get::<Alert>(&second).await.unwrap().status,
        AlertStatus::Resolved
    );
}

#[tokio::test]
async fn test_violation_in_progress_then_resolved() {
    let harness = TestHarness::new();
    let violation = harness
        .console
        .create(PolicyViolation {
            violation_type: "Unencrypted disk".into(),
            description: "Laptop-07 has no disk encryption".into(),
            severity: "High".into(),
            ..PolicyViolation::default()
        })
        .await
        .unwrap();

    harness
        .console
        .transition::<PolicyViolation>(&violation.id, Transition::Acknowledge)
        .await
        .unwrap();
    assert_eq!(
        harness.remote.rows("policy_violations")[0]["status"],
        "In Progress"
    );
    assert_eq!(harness.console.compliance().await.open_violations["High"], 1);

    harness
        .console
        .transition::<PolicyViolation>(&violation.id, Transition::Resolve)
        .await
        .unwrap();
    let local = harness
        .console
        .get::<PolicyViolation>(&violation.id)
        .await
        .unwrap();
    assert_eq!(local.status, ViolationStatus::Resolved);
    assert!(local.resolved_date.is_some());
    assert!(harness.console.compliance().await.open_violations.is_empty());
}
