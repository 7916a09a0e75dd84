// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types for the tiered session memory.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strata_core::{ArchiveId, TierKind, Turn, TurnNumber};

/// A verbatim turn resident in the immediate tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImmediateEntry {
    /// The turn as ingested.
    pub turn: Turn,
    /// Token length of the rendered transcript.
    pub length: usize,
}

/// A compressed turn resident in the condensed tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CondensedEntry {
    pub turn_number: TurnNumber,
    /// Summary of the turn transcript.
    pub compressed_text: String,
    /// Token length of `compressed_text`.
    pub compressed_length: usize,
    /// Token length of the transcript before compression.
    pub original_length: usize,
    pub entities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    /// True when the summarizer failed and the text is a truncation.
    #[serde(default)]
    pub fallback: bool,
}

/// An ultra-compressed turn resident in the archive tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchivedMemory {
    /// Sequential id assigned when the memory entered the archive.
    pub id: ArchiveId,
    pub turn_number: TurnNumber,
    pub ultra_text: String,
    pub entities: BTreeSet<String>,
    /// Token length of `ultra_text`.
    pub length: usize,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub fallback: bool,
}

/// Output of one compression step, before it is placed in a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compression {
    pub text: String,
    pub length: usize,
    /// True when the text came from truncation rather than the summarizer.
    pub fallback: bool,
}

/// How far a single ingest pushed entries down the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeDepth {
    /// The immediate tier had room.
    Stored,
    /// The oldest immediate turn moved into the condensed tier.
    Condensed,
    /// The oldest condensed turn additionally moved into the archive.
    Archived,
    /// The archive was full and discarded its oldest memory.
    Discarded,
}

impl CascadeDepth {
    /// Number of tier boundaries crossed (0 to 3).
    pub fn levels(self) -> u8 {
        match self {
            CascadeDepth::Stored => 0,
            CascadeDepth::Condensed => 1,
            CascadeDepth::Archived => 2,
            CascadeDepth::Discarded => 3,
        }
    }
}

/// Result of [`crate::TieredMemory::ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReceipt {
    /// Number assigned to the ingested turn.
    pub turn_number: TurnNumber,
    pub cascade: CascadeDepth,
    /// Whether any compression in this cascade fell back to truncation.
    pub fallback_used: bool,
}

/// A retrievable view of a condensed entry or an archived memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub turn_number: TurnNumber,
    pub text: String,
    pub entities: BTreeSet<String>,
    pub tokens: usize,
    pub source: TierKind,
}

impl From<&CondensedEntry> for Candidate {
    fn from(entry: &CondensedEntry) -> Self {
        Self {
            turn_number: entry.turn_number,
            text: entry.compressed_text.clone(),
            entities: entry.entities.clone(),
            tokens: entry.compressed_length,
            source: TierKind::Condensed,
        }
    }
}

impl From<&ArchivedMemory> for Candidate {
    fn from(memory: &ArchivedMemory) -> Self {
        Self {
            turn_number: memory.turn_number,
            text: memory.ultra_text.clone(),
            entities: memory.entities.clone(),
            tokens: memory.length,
            source: TierKind::Archive,
        }
    }
}

/// The three weighted components of a hybrid relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    /// Word-set Jaccard overlap, in [0, 1].
    pub textual: f64,
    /// Share of query entities the candidate carries, in [0, 1].
    pub entity: f64,
    /// Exponential recency decay, in (0, 1].
    pub recency: f64,
}

/// A candidate with its final hybrid score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub components: ScoreBreakdown,
}

/// Occupancy of a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierStats {
    pub occupancy: usize,
    pub capacity: usize,
    pub tokens: usize,
}

/// Snapshot of memory usage across the tiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MemoryStats {
    pub turn_count: TurnNumber,
    pub immediate: TierStats,
    pub condensed: TierStats,
    pub archive: TierStats,
    /// Tokens always present in recent context (immediate + condensed).
    pub total_active_tokens: usize,
    /// Distinct entity keys in the archive index.
    pub distinct_entities: usize,
}
