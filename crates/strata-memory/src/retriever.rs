// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retriever ranking condensed and archived turns for a query.
//!
//! Each candidate is scored as a weighted sum of textual overlap with the
//! query clues, entity overlap with the query entities and exponential
//! recency. Immediate-tier turns are always in context and never ranked.
//! Retrieval is read-only.

use std::sync::Arc;

use strata_config::RetrievalConfig;
use strata_core::{QueryClues, StrataError, TurnNumber};
use tracing::debug;

use crate::orchestrator::TieredMemory;
use crate::scoring::{rank_order, HybridScorer, Query};
use crate::types::{Candidate, ScoredCandidate};

/// Ranks resident memories of one [`TieredMemory`].
pub struct HybridRetriever {
    memory: Arc<TieredMemory>,
    scorer: HybridScorer,
    config: RetrievalConfig,
}

impl HybridRetriever {
    /// Creates a retriever, rejecting negative or non-finite weights and a
    /// non-positive decay scale.
    pub fn new(memory: Arc<TieredMemory>, config: &RetrievalConfig) -> Result<Self, StrataError> {
        config.check()?;
        Ok(Self {
            memory,
            scorer: HybridScorer::new(config.clone()),
            config: config.clone(),
        })
    }

    /// Top `top_k` candidates for the query, best first.
    pub async fn retrieve(
        &self,
        query_entities: &[String],
        query_text: &str,
        top_k: usize,
        current_turn: TurnNumber,
    ) -> Vec<ScoredCandidate> {
        let candidates = self.memory.candidates().await;
        if candidates.is_empty() {
            return Vec::new();
        }

        let query = Query::new(query_text, query_entities, current_turn);
        let pool = candidates.len();
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| self.scorer.score(candidate, &query))
            .collect();
        scored.sort_by(rank_order);
        scored.truncate(top_k);

        for (rank, hit) in scored.iter().enumerate() {
            debug!(
                rank = rank + 1,
                turn_number = hit.candidate.turn_number,
                source = %hit.candidate.source,
                score = hit.score,
                textual = hit.components.textual,
                entity = hit.components.entity,
                recency = hit.components.recency,
                "retrieval hit"
            );
        }
        debug!(pool, returned = scored.len(), "hybrid retrieval complete");
        scored
    }

    /// Retrieves with expander clues at the memory's current turn.
    pub async fn retrieve_clues(&self, clues: &QueryClues, top_k: usize) -> Vec<ScoredCandidate> {
        let current_turn = self.memory.turn_count().await;
        self.retrieve(&clues.entities, &clues.clues, top_k, current_turn)
            .await
    }

    /// Retrieves with the configured default `top_k`.
    pub async fn retrieve_default(&self, clues: &QueryClues) -> Vec<ScoredCandidate> {
        self.retrieve_clues(clues, self.config.top_k).await
    }

    /// Exact entity lookup: archive via the index, then condensed.
    pub async fn search_by_entity(&self, entity: &str) -> Vec<Candidate> {
        self.memory.search_by_entity(entity).await
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}
