// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Condensed tier: recently evicted turns, compressed.

use strata_core::{normalize_entity, TurnNumber};

use super::{FifoTier, TierEntry};
use crate::types::{Compression, CondensedEntry, ImmediateEntry};

pub type CondensedTier = FifoTier<CondensedEntry>;

impl TierEntry for CondensedEntry {
    fn turn_number(&self) -> TurnNumber {
        self.turn_number
    }

    fn tokens(&self) -> usize {
        self.compressed_length
    }
}

impl CondensedEntry {
    /// Builds the condensed form of an evicted immediate entry.
    pub fn from_evicted(source: &ImmediateEntry, compression: Compression) -> Self {
        Self {
            turn_number: source.turn.turn_number,
            compressed_text: compression.text,
            compressed_length: compression.length,
            original_length: source.length,
            entities: source.turn.entities.clone(),
            created_at: source.turn.created_at,
            fallback: compression.fallback,
        }
    }

    /// Whether this entry lists `entity`, case-insensitively.
    pub fn mentions(&self, entity: &str) -> bool {
        let wanted = normalize_entity(entity);
        self.entities.iter().any(|e| normalize_entity(e) == wanted)
    }

    /// Context block for this entry.
    pub fn render(&self) -> String {
        let mut block = format!(
            "[Turn {} - Compressed Summary]\n{}",
            self.turn_number, self.compressed_text
        );
        if !self.entities.is_empty() {
            let entities: Vec<&str> = self.entities.iter().map(String::as_str).collect();
            block.push_str("\nEntities: ");
            block.push_str(&entities.join(", "));
        }
        block
    }
}

impl CondensedTier {
    /// Linear scan for entries listing `entity`, oldest first.
    pub fn search_entity(&self, entity: &str) -> Vec<&CondensedEntry> {
        self.entries().filter(|e| e.mentions(entity)).collect()
    }
}
