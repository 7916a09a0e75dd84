// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based query expansion and parsing of model-produced clue documents.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use strata_core::{QueryClues, QueryExpander, StrataError};
use tracing::debug;

static CAPITALIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").unwrap());
static QUARTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)q[1-4]").unwrap());
static MONEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$\d+\.?\d*[KMB]?").unwrap());

/// Domain terms picked up wherever they occur in the text.
pub const BUSINESS_TERMS: &[&str] = &[
    "revenue",
    "profit",
    "customers",
    "growth",
    "churn",
    "pricing",
    "competitors",
    "market",
    "sales",
    "cost",
];

const FREE_FORM_REASONING: &str = "extracted from free-form response";

/// Keyword entities in `text`: capitalized words, business terms, quarter
/// references (upper-cased) and money amounts. Sorted and deduplicated.
pub fn extract_entities(text: &str) -> Vec<String> {
    let mut entities: BTreeSet<String> = CAPITALIZED
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let lowered = text.to_lowercase();
    entities.extend(
        BUSINESS_TERMS
            .iter()
            .filter(|term| lowered.contains(*term))
            .map(|term| term.to_string()),
    );
    entities.extend(QUARTER.find_iter(text).map(|m| m.as_str().to_uppercase()));
    entities.extend(MONEY.find_iter(text).map(|m| m.as_str().to_string()));

    entities.into_iter().collect()
}

/// Expands a query into itself plus its keyword entities. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExpander;

#[async_trait]
impl QueryExpander for KeywordExpander {
    async fn expand(&self, query: &str) -> Result<QueryClues, StrataError> {
        let entities = extract_entities(query);
        debug!(entities = entities.len(), "keyword expansion");
        Ok(QueryClues::from_query(query, entities))
    }
}

#[derive(Debug, Deserialize)]
struct ClueDocument {
    clues: Option<String>,
    #[serde(default)]
    entities: Vec<String>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    likely_turns: Vec<serde_json::Value>,
}

/// Parses a clue document from model output.
///
/// Takes the span from the first `{` to the last `}` as JSON. If that does
/// not parse, the whole response becomes the clue text with keyword
/// entities. A blank response falls back to `fallback_query`.
pub fn parse_clue_response(response: &str, fallback_query: &str) -> QueryClues {
    if response.trim().is_empty() {
        return QueryClues::from_query(fallback_query, extract_entities(fallback_query));
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}'))
        && start < end
    {
        match serde_json::from_str::<ClueDocument>(&response[start..=end]) {
            Ok(doc) => {
                let clues = match doc.clues {
                    Some(clues) if !clues.trim().is_empty() => clues,
                    Some(_) => fallback_query.to_string(),
                    None => response.to_string(),
                };
                return QueryClues {
                    clues,
                    entities: doc.entities,
                    reasoning: doc.reasoning,
                    likely_turns: doc.likely_turns,
                };
            }
            Err(err) => debug!(error = %err, "clue response is not a JSON document"),
        }
    }

    QueryClues {
        clues: response.to_string(),
        entities: extract_entities(response),
        reasoning: FREE_FORM_REASONING.to_string(),
        likely_turns: Vec::new(),
    }
}
