// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inverted index from lower-cased entity to the archived memories that list it.
//!
//! Mutation is crate-private: only [`crate::tiers::ArchiveTier`] inserts and
//! removes ids, in the same call that adds or drops the memory.

use std::collections::{BTreeMap, BTreeSet};

use strata_core::{normalize_entity, ArchiveId};

use crate::types::ArchivedMemory;

/// Entity key to ordered set of archive ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIndex {
    entries: BTreeMap<String, BTreeSet<ArchiveId>>,
}

impl EntityIndex {
    /// Rebuilds an index from resident memories.
    pub fn from_memories<'a>(memories: impl IntoIterator<Item = &'a ArchivedMemory>) -> Self {
        let mut index = Self::default();
        for memory in memories {
            index.insert(memory.id, &memory.entities);
        }
        index
    }

    pub(crate) fn insert(&mut self, id: ArchiveId, entities: &BTreeSet<String>) {
        for entity in entities {
            let key = normalize_entity(entity);
            if key.is_empty() {
                continue;
            }
            self.entries.entry(key).or_default().insert(id);
        }
    }

    pub(crate) fn remove(&mut self, id: ArchiveId, entities: &BTreeSet<String>) {
        for entity in entities {
            let key = normalize_entity(entity);
            if let Some(ids) = self.entries.get_mut(&key) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.entries.remove(&key);
                }
            }
        }
    }

    /// Archive ids listing `entity`, case-insensitively. Empty for unknown entities.
    pub fn lookup(&self, entity: &str) -> impl Iterator<Item = ArchiveId> + '_ {
        self.entries
            .get(&normalize_entity(entity))
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Number of distinct entity keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializable form: entity to ascending ids.
    pub fn to_map(&self) -> BTreeMap<String, Vec<ArchiveId>> {
        self.entries
            .iter()
            .map(|(entity, ids)| (entity.clone(), ids.iter().copied().collect()))
            .collect()
    }
}
