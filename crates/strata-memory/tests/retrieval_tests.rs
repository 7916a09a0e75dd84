// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for hybrid retrieval over a populated memory.

use strata_config::RetrievalConfig;
use strata_core::{QueryExpander, TierKind, TurnInput};
use strata_memory::{HybridRetriever, KeywordExpander};
use strata_test_utils::fixtures::{finance_review, numbered_turns};
use strata_test_utils::{MockExpander, TestHarness};

fn scenario_turns() -> Vec<TurnInput> {
    vec![
        TurnInput::new("How big is the team?", "Twelve engineers.").with_entities(["team"]),
        TurnInput::new("What about Q2 revenue?", "Q2 revenue was $5M.").with_entities(["Q2", "revenue"]),
        TurnInput::new("And Q3 revenue?", "Q3 revenue was $6M.").with_entities(["Q3", "revenue"]),
        TurnInput::new("Any churn?", "Churn held at 3%.").with_entities(["churn"]),
        TurnInput::new("Hiring plans?", "Two more in spring.").with_entities(["hiring"]),
    ]
}

#[tokio::test]
async fn entity_match_ranks_first() {
    let harness = TestHarness::builder().with_capacities(2, 2, 10).build().unwrap();
    harness.ingest_all(scenario_turns()).await;
    assert_eq!(
        harness.memory.tier_turns().await,
        (vec![4, 5], vec![2, 3], vec![1])
    );

    let hits = harness
        .retriever
        .retrieve(&["Q3".to_string()], "Q3 revenue", 5, 5)
        .await;
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].candidate.turn_number, 3);
    assert_eq!(hits[0].candidate.source, TierKind::Condensed);
    assert_eq!(hits[0].components.entity, 1.0);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn no_query_entities_scores_every_candidate_neutral() {
    let harness = TestHarness::builder().with_capacities(2, 2, 10).build().unwrap();
    harness.ingest_all(scenario_turns()).await;

    let hits = harness.retriever.retrieve(&[], "revenue", 10, 5).await;
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.components.entity == 0.5));
}

#[tokio::test]
async fn retrieval_is_deterministic_and_read_only() {
    let harness = TestHarness::builder().with_capacities(2, 3, 10).build().unwrap();
    harness.ingest_all(finance_review()).await;
    let before = harness.memory.export().await;

    let query = ["Q2".to_string(), "revenue".to_string()];
    let first = harness.retriever.retrieve(&query, "Q2 revenue", 4, 10).await;
    let second = harness.retriever.retrieve(&query, "Q2 revenue", 4, 10).await;
    assert_eq!(first, second);
    assert_eq!(harness.memory.export().await, before);
}

#[tokio::test]
async fn equal_scores_prefer_newer_turns() {
    let weights = RetrievalConfig {
        text_weight: 0.0,
        entity_weight: 1.0,
        recency_weight: 0.0,
        ..RetrievalConfig::default()
    };
    let harness = TestHarness::builder()
        .with_capacities(1, 4, 10)
        .with_retrieval(weights)
        .build()
        .unwrap();
    harness.ingest_all(numbered_turns(5)).await;

    let hits = harness.retriever.retrieve(&[], "anything", 3, 5).await;
    let order: Vec<_> = hits.iter().map(|h| h.candidate.turn_number).collect();
    assert_eq!(order, vec![4, 3, 2]);
}

#[tokio::test]
async fn future_turns_get_full_recency() {
    let harness = TestHarness::builder().with_capacities(1, 2, 10).build().unwrap();
    harness.ingest_all(numbered_turns(3)).await;
    let hits = harness.retriever.retrieve(&[], "x", 5, 0).await;
    assert!(hits.iter().all(|h| h.components.recency == 1.0));
}

#[tokio::test]
async fn keyword_clues_surface_the_original_answer() {
    let harness = TestHarness::builder().with_capacities(2, 3, 20).build().unwrap();
    harness.ingest_all(finance_review()).await;

    let clues = KeywordExpander
        .expand("what did we project for Q3?")
        .await
        .unwrap();
    let hits = harness.retriever.retrieve_clues(&clues, 3).await;
    assert_eq!(hits[0].candidate.turn_number, 6);
}

#[tokio::test]
async fn mock_expander_clues_drive_retrieval() {
    let harness = TestHarness::builder().with_capacities(2, 3, 20).build().unwrap();
    harness.ingest_all(finance_review()).await;

    let expander = MockExpander::with_clues(vec![strata_core::QueryClues::from_query(
        "churn",
        vec!["churn".to_string()],
    )]);
    let clues = expander.expand("that number from before").await.unwrap();
    let hits = harness.retriever.retrieve_clues(&clues, 1).await;
    assert_eq!(hits[0].candidate.turn_number, 4);
}

#[tokio::test]
async fn search_by_entity_spans_archive_and_condensed() {
    let harness = TestHarness::builder().with_capacities(2, 3, 20).build().unwrap();
    harness.ingest_all(finance_review()).await;

    // Immediate {9, 10}, condensed {6, 7, 8}, archive {1..5}.
    let hits: Vec<_> = harness
        .retriever
        .search_by_entity("q2")
        .await
        .into_iter()
        .map(|c| (c.turn_number, c.source))
        .collect();
    assert_eq!(hits, vec![(2, TierKind::Archive), (8, TierKind::Condensed)]);
    assert!(harness.retriever.search_by_entity("unknown").await.is_empty());
}

#[tokio::test]
async fn invalid_weights_are_rejected() {
    let harness = TestHarness::builder().build().unwrap();
    let config = RetrievalConfig {
        recency_scale: 0.0,
        ..RetrievalConfig::default()
    };
    assert!(HybridRetriever::new(harness.memory.clone(), &config).is_err());
}
