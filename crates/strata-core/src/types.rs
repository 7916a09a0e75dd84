// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the memory tiers and their collaborators.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Monotonically increasing turn counter value. The first turn is 1.
pub type TurnNumber = u64;

/// Identifier assigned to a memory when it enters the archive tier.
pub type ArchiveId = u64;

/// Identifies one of the three memory tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    /// Last few turns, verbatim.
    Immediate,
    /// Recently evicted turns, compressed to roughly half.
    Condensed,
    /// Long-tail turns, ultra-compressed and entity indexed.
    Archive,
}

/// A finished turn as submitted by the caller, before a turn number is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    /// What the user said.
    pub user_text: String,
    /// What the assistant answered.
    pub response_text: String,
    /// Raw tool output attached to the turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<String>,
    /// Keywords (names, metrics, dates) associated with the turn.
    #[serde(default)]
    pub entities: Vec<String>,
}

impl TurnInput {
    /// Convenience constructor for a plain user/assistant exchange.
    pub fn new(user_text: impl Into<String>, response_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            response_text: response_text.into(),
            tool_output: None,
            entities: Vec::new(),
        }
    }

    /// Attach entities to this input.
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a tool output to this input.
    pub fn with_tool_output(mut self, output: impl Into<String>) -> Self {
        self.tool_output = Some(output.into());
        self
    }
}

/// An immutable conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    pub turn_number: TurnNumber,
    pub user_text: String,
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<String>,
    pub entities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Wraps caller input as a numbered turn stamped with the current time.
    pub fn from_input(turn_number: TurnNumber, input: TurnInput) -> Self {
        Self {
            turn_number,
            user_text: input.user_text,
            response_text: input.response_text,
            tool_output: input.tool_output.filter(|t| !t.trim().is_empty()),
            entities: input
                .entities
                .into_iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            created_at: Utc::now(),
        }
    }

    /// Renders the turn as the transcript text that is measured and compressed.
    pub fn transcript(&self) -> String {
        let mut text = format!("User: {}\nAssistant: {}", self.user_text, self.response_text);
        if let Some(tool) = &self.tool_output {
            text.push_str("\nTool: ");
            text.push_str(tool);
        }
        text
    }
}

/// Retrieval clues produced by a query expander.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryClues {
    /// Retrieval-oriented restatement of the query, used as the scoring text.
    pub clues: String,
    /// Entities the answer likely involves.
    #[serde(default)]
    pub entities: Vec<String>,
    /// Why the expander chose these clues.
    #[serde(default)]
    pub reasoning: String,
    /// Turns the expander believes hold the answer (free-form hints).
    #[serde(default)]
    pub likely_turns: Vec<serde_json::Value>,
}

impl QueryClues {
    /// Clues that reuse the raw query text.
    pub fn from_query(query: impl Into<String>, entities: Vec<String>) -> Self {
        Self {
            clues: query.into(),
            entities,
            reasoning: String::new(),
            likely_turns: Vec::new(),
        }
    }
}

/// Lower-cases an entity for index keys and case-insensitive matching.
pub fn normalize_entity(entity: &str) -> String {
    entity.trim().to_lowercase()
}
