//! Kit membership is by id only; deletes never cascade.

use assetry_core::EntityKind;
use assetry_core::model::{Kit, License};

use crate::common::TestHarness;

#[tokio::test]
async fn test_deleting_listed_license_leaves_kit_untouched() {
    let harness = TestHarness::new();
    let console = &harness.console;
    let office = console
        .create(License {
            name: "Office".into(),
            ..License::default()
        })
        .await
        .unwrap();
    let ide = console
        .create(License {
            name: "IDE".into(),
            ..License::default()
        })
        .await
        .unwrap();
    let kit = console
        .create(Kit {
            name: "Developer starter".into(),
            licenses: vec![office.id.clone(), ide.id.clone()],
            ..Kit::default()
        })
        .await
        .unwrap();

    console.delete::<License>(&office.id, &true).await.unwrap();

    let local = console.get::<Kit>(&kit.id).await.unwrap();
    assert_eq!(local.licenses, vec![office.id.clone(), ide.id.clone()]);
    let remote = &harness.remote.rows("predefined_kits")[0];
    assert_eq!(remote["licenses"].as_array().unwrap().len(), 2);

    let contents = console.kit_contents(&kit.id).await.unwrap();
    assert_eq!(contents.licenses.len(), 1);
    assert_eq!(contents.licenses[0].name, "IDE");
    assert_eq!(contents.dangling, vec![(EntityKind::License, office.id)]);
    assert_eq!(contents.resolved(), 1);
}

#[tokio::test]
async fn test_missing_kit_is_not_found() {
    let harness = TestHarness::new();
    let err = harness
        .console
        .kit_contents(&"k-404".into())
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_core(),
        Some(assetry_core::Error::NotFound { .. })
    ));
}
