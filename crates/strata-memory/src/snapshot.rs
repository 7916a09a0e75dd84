// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export/import document for the complete memory state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strata_config::TierConfig;
use strata_core::{ArchiveId, StrataError, TurnNumber};

use crate::entity_index::EntityIndex;
use crate::tiers::TierEntry;
use crate::types::{ArchivedMemory, CondensedEntry, ImmediateEntry};

/// Every tier, the entity index and both counters as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemorySnapshot {
    pub turn_count: TurnNumber,
    pub next_archive_id: ArchiveId,
    pub immediate: Vec<ImmediateEntry>,
    pub condensed: Vec<CondensedEntry>,
    pub archive: Vec<ArchivedMemory>,
    pub entity_index: BTreeMap<String, Vec<ArchiveId>>,
}

impl MemorySnapshot {
    /// Pretty JSON form.
    pub fn to_json(&self) -> Result<String, StrataError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StrataError::Internal(format!("failed to serialize snapshot: {e}")))
    }

    /// Parses a snapshot; structural errors map to [`StrataError::ImportFormat`].
    pub fn from_json(json: &str) -> Result<Self, StrataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the snapshot against tier capacities and cross-tier invariants.
    pub fn validate(&self, tiers: &TierConfig) -> Result<(), StrataError> {
        check_capacity("immediate", self.immediate.len(), tiers.immediate_capacity)?;
        check_capacity("condensed", self.condensed.len(), tiers.condensed_capacity)?;
        check_capacity("archive", self.archive.len(), tiers.archive_capacity)?;

        // Archive, then condensed, then immediate: oldest to newest.
        let turns = self
            .archive
            .iter()
            .map(|m| m.turn_number)
            .chain(self.condensed.iter().map(TierEntry::turn_number))
            .chain(self.immediate.iter().map(TierEntry::turn_number));
        let mut previous: TurnNumber = 0;
        for turn in turns {
            if turn <= previous {
                return Err(StrataError::import(format!(
                    "turn numbers must increase from archive to immediate, found {turn} after {previous}"
                )));
            }
            if turn > self.turn_count {
                return Err(StrataError::import(format!(
                    "turn {turn} exceeds turn_count {}",
                    self.turn_count
                )));
            }
            previous = turn;
        }

        let mut previous_id: Option<ArchiveId> = None;
        for memory in &self.archive {
            if previous_id.is_some_and(|p| memory.id <= p) || memory.id >= self.next_archive_id {
                return Err(StrataError::import(format!(
                    "archive id {} is out of order or not below next_archive_id {}",
                    memory.id, self.next_archive_id
                )));
            }
            previous_id = Some(memory.id);
        }

        if EntityIndex::from_memories(&self.archive).to_map() != self.entity_index {
            return Err(StrataError::import(
                "entity_index does not match archived memories",
            ));
        }

        Ok(())
    }
}

fn check_capacity(tier: &str, len: usize, capacity: usize) -> Result<(), StrataError> {
    if len > capacity {
        return Err(StrataError::import(format!(
            "{tier} tier holds {len} entries, capacity is {capacity}"
        )));
    }
    Ok(())
}
