// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for snapshot export and import.

use strata_core::StrataError;
use strata_memory::MemorySnapshot;
use strata_test_utils::fixtures::finance_review;
use strata_test_utils::TestHarness;

async fn populated() -> TestHarness {
    let harness = TestHarness::builder().with_capacities(2, 3, 4).build().unwrap();
    harness.ingest_all(finance_review()).await;
    harness
}

#[tokio::test]
async fn import_of_export_is_byte_identical() {
    let source = populated().await;
    let exported = source.memory.export().await;

    let target = source.sibling_memory().unwrap();
    target.import(exported.clone()).await.unwrap();

    let reexported = target.export().await;
    assert_eq!(reexported.to_json().unwrap(), exported.to_json().unwrap());
    assert_eq!(target.stats().await, source.memory.stats().await);
    assert_eq!(
        target.recent_context().await,
        source.memory.recent_context().await
    );
}

#[tokio::test]
async fn ingest_continues_after_import() {
    let source = populated().await;
    let target = source.sibling_memory().unwrap();
    target.import(source.memory.export().await).await.unwrap();

    let receipt = target
        .ingest(strata_core::TurnInput::new("one more", "sure"))
        .await;
    assert_eq!(receipt.turn_number, 11);

    let snapshot = target.export().await;
    let last_id = snapshot.archive.last().map(|m| m.id).unwrap();
    assert_eq!(snapshot.next_archive_id, last_id + 1);
    assert_eq!(last_id, 6);
}

#[tokio::test]
async fn file_round_trip() {
    let source = populated().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");

    source.memory.export_to_path(&path).await.unwrap();
    let target = source.sibling_memory().unwrap();
    target.import_from_path(&path).await.unwrap();

    assert_eq!(target.export().await, source.memory.export().await);
}

#[tokio::test]
async fn malformed_json_leaves_state_unchanged() {
    let harness = populated().await;
    let before = harness.memory.export().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"turn_count": 3, "immediate": ["#).unwrap();

    let err = harness.memory.import_from_path(&path).await.unwrap_err();
    assert!(matches!(err, StrataError::ImportFormat { .. }));
    assert_eq!(harness.memory.export().await, before);
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let harness = populated().await;
    let err = harness
        .memory
        .import_from_path(std::path::Path::new("/nonexistent/strata/memory.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, StrataError::Io { .. }));
}

#[tokio::test]
async fn inconsistent_snapshot_is_rejected_without_side_effects() {
    let harness = populated().await;
    let before = harness.memory.export().await;

    let mut tampered: MemorySnapshot = before.clone();
    tampered.entity_index.remove("q2");
    assert!(matches!(
        harness.memory.import(tampered).await,
        Err(StrataError::ImportFormat { .. })
    ));

    let mut overfull = before.clone();
    overfull.immediate.extend(before.immediate.clone());
    assert!(harness.memory.import(overfull).await.is_err());

    assert_eq!(harness.memory.export().await, before);
}
