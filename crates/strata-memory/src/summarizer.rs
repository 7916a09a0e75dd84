// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic key-fact summarizer.
//!
//! Keeps the figures and names of a turn and drops everything else. Useful
//! offline and in demos where no model-backed summarizer is available.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use strata_core::{StrataError, Summarizer, TokenCounter};

static FIGURES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+\.?\d*[MBK]?|\d+%|\d+\.?\d*").unwrap());
static NAMES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?: +[A-Z][a-z]+)*\b").unwrap());

/// Transcript speaker labels, never reported as names.
const SPEAKER_LABELS: &[&str] = &["User", "Assistant", "Tool"];

const MAX_FIGURES: usize = 3;
const MAX_NAMES: usize = 2;

/// Summarizes as `Numbers: … | Entities: …`, truncated to the target budget.
pub struct KeyFactSummarizer {
    counter: Arc<dyn TokenCounter>,
}

impl KeyFactSummarizer {
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        Self { counter }
    }

    fn key_facts(text: &str) -> Option<String> {
        let figures = first_distinct(FIGURES.find_iter(text).map(|m| m.as_str()), MAX_FIGURES);
        let names = first_distinct(
            NAMES
                .find_iter(text)
                .map(|m| m.as_str())
                .filter(|name| !SPEAKER_LABELS.contains(name)),
            MAX_NAMES,
        );

        let mut parts = Vec::new();
        if !figures.is_empty() {
            parts.push(format!("Numbers: {}", figures.join(", ")));
        }
        if !names.is_empty() {
            parts.push(format!("Entities: {}", names.join(", ")));
        }
        (!parts.is_empty()).then(|| parts.join(" | "))
    }
}

fn first_distinct<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for item in items {
        if seen.len() == limit {
            break;
        }
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

#[async_trait]
impl Summarizer for KeyFactSummarizer {
    async fn summarize(&self, text: &str, target_tokens: usize) -> Result<String, StrataError> {
        let facts = Self::key_facts(text).unwrap_or_else(|| text.to_string());
        Ok(self.counter.truncate(&facts, target_tokens))
    }
}

impl std::fmt::Debug for KeyFactSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFactSummarizer").finish_non_exhaustive()
    }
}
