// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded containers for the three memory tiers.
//!
//! Immediate and condensed tiers are plain FIFO queues ([`FifoTier`]); the
//! archive additionally assigns ids and owns the [`crate::EntityIndex`].

mod archive;
mod condensed;
mod immediate;

use std::collections::VecDeque;

use strata_core::TurnNumber;

pub use archive::ArchiveTier;
pub use condensed::CondensedTier;
pub use immediate::ImmediateTier;

/// An entry a tier can hold: knows its turn and its token length.
pub trait TierEntry {
    fn turn_number(&self) -> TurnNumber;
    fn tokens(&self) -> usize;
}

/// Fixed-capacity FIFO queue that evicts its oldest entry on overflow.
#[derive(Debug, Clone)]
pub struct FifoTier<T> {
    entries: VecDeque<T>,
    capacity: usize,
    total_tokens: usize,
}

impl<T: TierEntry> FifoTier<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            total_tokens: 0,
        }
    }

    /// Rebuilds a tier from entries already in chronological order.
    pub(crate) fn restore(capacity: usize, entries: Vec<T>) -> Self {
        let total_tokens = entries.iter().map(TierEntry::tokens).sum();
        Self {
            entries: entries.into(),
            capacity,
            total_tokens,
        }
    }

    /// Appends `entry`, returning the oldest entry if the tier overflowed.
    pub(crate) fn push(&mut self, entry: T) -> Option<T> {
        self.total_tokens += entry.tokens();
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_front()?;
            self.total_tokens -= evicted.tokens();
            return Some(evicted);
        }
        None
    }

    /// The entry the next push would evict, if the tier is full.
    pub fn next_eviction(&self) -> Option<&T> {
        if self.is_full() {
            self.entries.front()
        } else {
            None
        }
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Turn numbers from oldest to newest.
    pub fn turn_numbers(&self) -> Vec<TurnNumber> {
        self.entries.iter().map(TierEntry::turn_number).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(TurnNumber, usize);

    impl TierEntry for Item {
        fn turn_number(&self) -> TurnNumber {
            self.0
        }
        fn tokens(&self) -> usize {
            self.1
        }
    }

    #[test]
    fn push_evicts_oldest_on_overflow() {
        let mut tier = FifoTier::new(2);
        assert_eq!(tier.push(Item(1, 10)), None);
        assert_eq!(tier.push(Item(2, 20)), None);
        assert!(tier.is_full());
        assert_eq!(tier.next_eviction(), Some(&Item(1, 10)));
        assert_eq!(tier.push(Item(3, 5)), Some(Item(1, 10)));
        assert_eq!(tier.turn_numbers(), vec![2, 3]);
        assert_eq!(tier.total_tokens(), 25);
    }

    #[test]
    fn huge_capacity_allocates_nothing_up_front() {
        let mut tier = FifoTier::new(usize::MAX / 2);
        assert!(tier.is_empty());
        assert_eq!(tier.push(Item(1, 3)), None);
        assert!(!tier.is_full());
    }

    #[test]
    fn next_eviction_is_none_with_room() {
        let mut tier = FifoTier::new(3);
        tier.push(Item(1, 1));
        assert_eq!(tier.next_eviction(), None);
        assert!(!tier.is_full());
    }

    #[test]
    fn restore_recomputes_tokens() {
        let tier = FifoTier::restore(4, vec![Item(5, 3), Item(6, 4)]);
        assert_eq!(tier.len(), 2);
        assert_eq!(tier.total_tokens(), 7);
        assert_eq!(tier.capacity(), 4);
    }
}
