//! Imports, integration sync and report runs.

use assetry_console::ImportSummary;
use assetry_core::model::{ImportRecord, ImportStatus, Integration, Report};

use crate::common::TestHarness;

#[tokio::test]
async fn test_import_lifecycle() {
    let harness = TestHarness::new();
    let started = harness
        .console
        .begin_import("assets-2024.csv", "assets")
        .await
        .unwrap();
    assert_eq!(started.status, ImportStatus::Processing);
    assert_eq!(started.records_processed, 0);
    assert!(started.import_date.is_some());

    let summary = ImportSummary {
        processed: 48,
        total: 50,
        errors: vec!["row 7: duplicate tag".into(), "row 31: missing name".into()],
    };
    let status = harness
        .console
        .finish_import(&started.id, &summary)
        .await
        .unwrap();
    assert_eq!(status, ImportStatus::Completed);

    let local = harness
        .console
        .get::<ImportRecord>(&started.id)
        .await
        .unwrap();
    assert_eq!(local.records_processed, 48);
    assert_eq!(local.total_records, 50);
    assert_eq!(local.errors.len(), 2);

    let row = &harness.remote.rows("import_records")[0];
    assert_eq!(row["status"], "completed");
    assert_eq!(row["records_processed"], 48);
}

#[tokio::test]
async fn test_import_with_nothing_processed_fails() {
    let harness = TestHarness::new();
    let started = harness
        .console
        .begin_import("broken.csv", "licenses")
        .await
        .unwrap();
    let status = harness
        .console
        .finish_import(
            &started.id,
            &ImportSummary {
                processed: 0,
                total: 0,
                errors: vec!["unreadable header".into()],
            },
        )
        .await
        .unwrap();
    assert_eq!(status, ImportStatus::Failed);
}

#[tokio::test]
async fn test_sync_and_run_stamp_times() {
    let harness = TestHarness::new();
    let integration = harness
        .console
        .create(Integration {
            name: "HR feed".into(),
            endpoint: "https://hr.example.com/api".into(),
            api_key: "secret".into(),
            ..Integration::default()
        })
        .await
        .unwrap();
    assert!(integration.last_sync.is_none());

    let synced = harness
        .console
        .sync_integration(&integration.id)
        .await
        .unwrap();
    let local = harness
        .console
        .get::<Integration>(&integration.id)
        .await
        .unwrap();
    assert_eq!(
        local.last_sync.map(|t| t.timestamp()),
        Some(synced.timestamp())
    );
    assert!(harness.remote.rows("integrations")[0]["last_sync"].is_string());

    let report = harness
        .console
        .create(Report {
            name: "Warranty expiries".into(),
            ..Report::default()
        })
        .await
        .unwrap();
    harness.console.run_report(&report.id).await.unwrap();
    assert!(
        harness
            .console
            .get::<Report>(&report.id)
            .await
            .unwrap()
            .last_run
            .is_some()
    );
}

#[tokio::test]
async fn test_sync_while_offline_leaves_integration_untouched() {
    let harness = TestHarness::new();
    let integration = harness
        .console
        .create(Integration {
            name: "MDM".into(),
            endpoint: "https://mdm.example.com".into(),
            api_key: "k".into(),
            ..Integration::default()
        })
        .await
        .unwrap();
    harness.remote.set_available(false);
    assert!(harness.console.sync_integration(&integration.id).await.is_err());
    assert!(
        harness
            .console
            .get::<Integration>(&integration.id)
            .await
            .unwrap()
            .last_sync
            .is_none()
    );
}
