// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archive tier: long-tail turns, ultra-compressed and entity indexed.
//!
//! Ids are assigned sequentially and memories leave strictly in insertion
//! order, so the resident ids are always ascending.

use std::collections::VecDeque;

use strata_core::{ArchiveId, TurnNumber};

use crate::entity_index::EntityIndex;
use crate::types::{ArchivedMemory, Compression, CondensedEntry};

#[derive(Debug, Clone)]
pub struct ArchiveTier {
    memories: VecDeque<ArchivedMemory>,
    capacity: usize,
    next_id: ArchiveId,
    index: EntityIndex,
    total_tokens: usize,
}

impl ArchiveTier {
    pub fn new(capacity: usize) -> Self {
        Self {
            memories: VecDeque::new(),
            capacity,
            next_id: 1,
            index: EntityIndex::default(),
            total_tokens: 0,
        }
    }

    /// Rebuilds the tier and its index from validated snapshot contents.
    pub(crate) fn restore(
        capacity: usize,
        next_id: ArchiveId,
        memories: Vec<ArchivedMemory>,
    ) -> Self {
        let index = EntityIndex::from_memories(&memories);
        let total_tokens = memories.iter().map(|m| m.length).sum();
        Self {
            memories: memories.into(),
            capacity,
            next_id,
            index,
            total_tokens,
        }
    }

    /// Archives an evicted condensed entry under the next id.
    ///
    /// When full, the oldest memory is discarded and unindexed first; it is
    /// returned alongside the new id.
    pub(crate) fn insert(
        &mut self,
        source: &CondensedEntry,
        compression: Compression,
    ) -> (ArchiveId, Option<ArchivedMemory>) {
        let evicted = if self.is_full() {
            self.evict_oldest()
        } else {
            None
        };

        let id = self.next_id;
        self.next_id += 1;
        let memory = ArchivedMemory {
            id,
            turn_number: source.turn_number,
            ultra_text: compression.text,
            entities: source.entities.clone(),
            length: compression.length,
            created_at: source.created_at,
            fallback: compression.fallback,
        };
        self.index.insert(id, &memory.entities);
        self.total_tokens += memory.length;
        self.memories.push_back(memory);

        (id, evicted)
    }

    fn evict_oldest(&mut self) -> Option<ArchivedMemory> {
        let oldest = self.memories.pop_front()?;
        self.index.remove(oldest.id, &oldest.entities);
        self.total_tokens -= oldest.length;
        Some(oldest)
    }

    /// Looks up a resident memory by id.
    pub fn get(&self, id: ArchiveId) -> Option<&ArchivedMemory> {
        let (front, back) = self.memories.as_slices();
        if let Ok(pos) = front.binary_search_by_key(&id, |m| m.id) {
            return front.get(pos);
        }
        back.binary_search_by_key(&id, |m| m.id)
            .ok()
            .and_then(|pos| back.get(pos))
    }

    /// Memories listing `entity`, in archive order, via the index.
    pub fn search_entity(&self, entity: &str) -> Vec<&ArchivedMemory> {
        self.index.lookup(entity).filter_map(|id| self.get(id)).collect()
    }

    /// The `n` most recently archived memories, newest first.
    pub fn recent(&self, n: usize) -> Vec<&ArchivedMemory> {
        self.memories.iter().rev().take(n).collect()
    }

    pub fn memories(&self) -> impl DoubleEndedIterator<Item = &ArchivedMemory> + ExactSizeIterator {
        self.memories.iter()
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    /// Id the next archived memory will receive.
    pub fn next_id(&self) -> ArchiveId {
        self.next_id
    }

    pub fn is_full(&self) -> bool {
        self.memories.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    pub fn turn_numbers(&self) -> Vec<TurnNumber> {
        self.memories.iter().map(|m| m.turn_number).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn condensed(turn_number: TurnNumber, entities: &[&str]) -> CondensedEntry {
        CondensedEntry {
            turn_number,
            compressed_text: format!("turn {turn_number}"),
            compressed_length: 2,
            original_length: 4,
            entities: entities.iter().map(|e| e.to_string()).collect(),
            created_at: Utc::now(),
            fallback: false,
        }
    }

    fn ultra(text: &str) -> Compression {
        Compression {
            text: text.to_string(),
            length: 1,
            fallback: false,
        }
    }

    #[test]
    fn insert_assigns_sequential_ids_and_indexes() {
        let mut archive = ArchiveTier::new(5);
        let (first, evicted) = archive.insert(&condensed(1, &["Q3"]), ultra("a"));
        assert_eq!(first, 1);
        assert!(evicted.is_none());
        let (second, _) = archive.insert(&condensed(2, &["q3", "pricing"]), ultra("b"));
        assert_eq!(second, 2);
        assert_eq!(archive.next_id(), 3);
        assert_eq!(archive.index().lookup("Q3").collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(archive.total_tokens(), 2);
    }

    #[test]
    fn full_archive_discards_oldest_and_unindexes_it() {
        let mut archive = ArchiveTier::new(2);
        archive.insert(&condensed(1, &["churn"]), ultra("a"));
        archive.insert(&condensed(2, &["pricing"]), ultra("b"));
        let (id, evicted) = archive.insert(&condensed(3, &["pricing"]), ultra("c"));
        assert_eq!(id, 3);
        assert_eq!(evicted.map(|m| m.turn_number), Some(1));
        assert_eq!(archive.turn_numbers(), vec![2, 3]);
        assert_eq!(archive.index().lookup("churn").count(), 0);
        assert_eq!(archive.index().len(), 1);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn get_finds_ids_across_ring_wraparound() {
        let mut archive = ArchiveTier::new(3);
        for turn in 1..=7 {
            archive.insert(&condensed(turn, &["x"]), ultra("m"));
        }
        assert!(archive.get(4).is_none());
        for id in 5..=7 {
            assert_eq!(archive.get(id).map(|m| m.id), Some(id));
        }
        assert!(archive.get(8).is_none());
    }

    #[test]
    fn search_entity_resolves_through_index() {
        let mut archive = ArchiveTier::new(4);
        archive.insert(&condensed(1, &["Q3"]), ultra("a"));
        archive.insert(&condensed(2, &["Q4"]), ultra("b"));
        archive.insert(&condensed(3, &["Q3"]), ultra("c"));
        let hits: Vec<_> = archive.search_entity("q3").iter().map(|m| m.turn_number).collect();
        assert_eq!(hits, vec![1, 3]);
        assert!(archive.search_entity("nothing").is_empty());
    }

    #[test]
    fn recent_returns_newest_first() {
        let mut archive = ArchiveTier::new(4);
        for turn in 1..=3 {
            archive.insert(&condensed(turn, &[]), ultra("m"));
        }
        let recent: Vec<_> = archive.recent(2).iter().map(|m| m.turn_number).collect();
        assert_eq!(recent, vec![3, 2]);
    }

    #[test]
    fn restore_rebuilds_index() {
        let mut archive = ArchiveTier::new(4);
        archive.insert(&condensed(1, &["Q3"]), ultra("a"));
        archive.insert(&condensed(2, &["Q4"]), ultra("b"));
        let memories: Vec<_> = archive.memories().cloned().collect();
        let restored = ArchiveTier::restore(4, archive.next_id(), memories);
        assert_eq!(restored.index(), archive.index());
        assert_eq!(restored.total_tokens(), archive.total_tokens());
        assert_eq!(restored.next_id(), 3);
    }
}
