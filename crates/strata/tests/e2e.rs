// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete ingest, retrieve and assemble pipeline.
//!
//! Each test builds an isolated TestHarness over the demo conversation.
//! Tests are independent and order-insensitive.

use std::sync::Arc;

use strata_config::StrataConfig;
use strata_core::{TierKind, TokenCounter, TurnInput, WordCounter};
use strata_memory::{KeyFactSummarizer, TieredMemory};
use strata_test_utils::TestHarness;

fn demo_conversation() -> Vec<TurnInput> {
    serde_json::from_str(include_str!("../../../demos/conversation.json"))
        .expect("demo conversation should parse")
}

// ---- Test 1: Demo transcript through the cascade ----

#[tokio::test]
async fn demo_conversation_fills_the_tiers() {
    let harness = TestHarness::builder().build().unwrap();
    let turns = demo_conversation();
    assert_eq!(turns.len(), 8);
    harness.ingest_all(turns).await;

    assert_eq!(
        harness.memory.tier_turns().await,
        (vec![7, 8], vec![2, 3, 4, 5, 6], vec![1])
    );
    let stats = harness.memory.stats().await;
    assert_eq!(stats.turn_count, 8);
    assert_eq!(stats.archive.occupancy, 1);
    // Turn 1 carries "Q2" and "revenue".
    assert_eq!(stats.distinct_entities, 2);
}

// ---- Test 2: Retrieval feeds the assembled prompt ----

#[tokio::test]
async fn retrieved_turn_appears_in_assembled_prompt() {
    let harness = TestHarness::builder().build().unwrap();
    harness.ingest_all(demo_conversation()).await;

    let hits = harness
        .retriever
        .retrieve(&["Acme".to_string()], "Acme renewal owner", 2, 8)
        .await;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].candidate.turn_number, 2);
    assert_eq!(hits[0].candidate.source, TierKind::Condensed);

    let prompt = harness
        .assembler
        .assemble("Who owns the Acme renewal?", &hits, true)
        .await;
    let recent = prompt.find("# Recent Conversation").unwrap();
    let past = prompt.find("# Relevant Past Context").unwrap();
    let stats = prompt.find("# Memory Stats").unwrap();
    let query = prompt.find("# Current User Query").unwrap();
    assert!(prompt.starts_with("# System Instructions"));
    assert!(recent < past && past < stats && stats < query);
    assert!(prompt.contains("[Turn 2 - Retrieved from condensed]"));
    assert!(prompt.contains("User: Summarize the risks for the board."));
    assert!(prompt.contains("Total conversation turns: 8"));
}

// ---- Test 3: Snapshot survives a restart ----

#[tokio::test]
async fn snapshot_restores_retrieval_results() {
    let harness = TestHarness::builder().with_capacities(2, 2, 10).build().unwrap();
    harness.ingest_all(demo_conversation()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");
    harness.memory.export_to_path(&path).await.unwrap();

    let restored = Arc::new(harness.sibling_memory().unwrap());
    restored.import_from_path(&path).await.unwrap();

    let query = ["churn".to_string()];
    let before = harness.retriever.retrieve(&query, "churn", 3, 8).await;
    let after = strata_memory::HybridRetriever::new(restored.clone(), &harness.config.retrieval)
        .unwrap()
        .retrieve(&query, "churn", 3, 8)
        .await;
    assert_eq!(before, after);
    assert_eq!(restored.recent_context().await, harness.memory.recent_context().await);
}

// ---- Test 4: Built-in summarizer keeps summaries within budget ----

#[tokio::test]
async fn key_fact_summarizer_stays_within_budget() {
    let counter: Arc<dyn TokenCounter> = Arc::new(WordCounter);
    let memory = TieredMemory::from_config(
        &StrataConfig::default(),
        Arc::new(KeyFactSummarizer::new(counter.clone())),
        counter,
    )
    .unwrap();
    for turn in demo_conversation() {
        memory.ingest(turn).await;
    }

    let snapshot = memory.export().await;
    assert_eq!(snapshot.condensed.len(), 5);
    for entry in &snapshot.condensed {
        assert!(!entry.compressed_text.trim().is_empty());
        assert!(entry.compressed_length <= entry.original_length);
    }
    assert_eq!(snapshot.archive.len(), 1);
    assert!(snapshot.archive[0].length >= 1);
}
