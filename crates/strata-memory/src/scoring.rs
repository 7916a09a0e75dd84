// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component scores for hybrid retrieval.
//!
//! Textual overlap is a word-set Jaccard index over lower-cased,
//! whitespace-split words with a fixed stop-word list removed. Words keep
//! their punctuation, so `revenue?` and `revenue` are different words.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use strata_config::RetrievalConfig;
use strata_core::{normalize_entity, TurnNumber};

use crate::types::{Candidate, ScoreBreakdown, ScoredCandidate};

/// Words ignored by textual overlap.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had",
];

/// Entity score when the query names no entities.
pub const NEUTRAL_ENTITY_SCORE: f64 = 0.5;

/// Lower-cased content words of `text`.
pub fn content_words(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Jaccard index of the content words; 0 when either side has none.
pub fn textual_overlap(candidate: &BTreeSet<String>, query: &BTreeSet<String>) -> f64 {
    if candidate.is_empty() || query.is_empty() {
        return 0.0;
    }
    let shared = candidate.intersection(query).count();
    let union = candidate.len() + query.len() - shared;
    shared as f64 / union as f64
}

/// Share of the (normalized) query entities that the candidate lists.
pub fn entity_overlap(candidate: &BTreeSet<String>, query: &BTreeSet<String>) -> f64 {
    if query.is_empty() {
        return NEUTRAL_ENTITY_SCORE;
    }
    if candidate.is_empty() {
        return 0.0;
    }
    let candidate: BTreeSet<String> = candidate.iter().map(|e| normalize_entity(e)).collect();
    let shared = query.iter().filter(|e| candidate.contains(*e)).count();
    shared as f64 / query.len() as f64
}

/// `exp(-distance / scale)`; candidates newer than `current` count as distance 0.
pub fn recency(current: TurnNumber, turn: TurnNumber, scale: f64) -> f64 {
    let distance = current.saturating_sub(turn) as f64;
    (-distance / scale).exp()
}

/// A query prepared once for scoring many candidates.
#[derive(Debug, Clone)]
pub struct Query {
    words: BTreeSet<String>,
    entities: BTreeSet<String>,
    current_turn: TurnNumber,
}

impl Query {
    pub fn new(text: &str, entities: &[String], current_turn: TurnNumber) -> Self {
        Self {
            words: content_words(text),
            entities: entities
                .iter()
                .map(|e| normalize_entity(e))
                .filter(|e| !e.is_empty())
                .collect(),
            current_turn,
        }
    }
}

/// Weighted combination of the three components.
#[derive(Debug, Clone)]
pub struct HybridScorer {
    weights: RetrievalConfig,
}

impl HybridScorer {
    pub fn new(weights: RetrievalConfig) -> Self {
        Self { weights }
    }

    pub fn score(&self, candidate: Candidate, query: &Query) -> ScoredCandidate {
        let components = ScoreBreakdown {
            textual: textual_overlap(&content_words(&candidate.text), &query.words),
            entity: entity_overlap(&candidate.entities, &query.entities),
            recency: recency(
                query.current_turn,
                candidate.turn_number,
                self.weights.recency_scale,
            ),
        };
        let score = self.weights.text_weight * components.textual
            + self.weights.entity_weight * components.entity
            + self.weights.recency_weight * components.recency;
        ScoredCandidate {
            candidate,
            score,
            components,
        }
    }
}

/// Descending score, ties broken by descending turn number.
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.candidate.turn_number.cmp(&a.candidate.turn_number))
}
