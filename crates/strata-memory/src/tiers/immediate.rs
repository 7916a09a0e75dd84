// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immediate tier: the last few turns, verbatim.

use strata_core::{TokenCounter, Turn, TurnNumber};

use super::{FifoTier, TierEntry};
use crate::types::ImmediateEntry;

pub type ImmediateTier = FifoTier<ImmediateEntry>;

impl TierEntry for ImmediateEntry {
    fn turn_number(&self) -> TurnNumber {
        self.turn.turn_number
    }

    fn tokens(&self) -> usize {
        self.length
    }
}

impl ImmediateEntry {
    /// Wraps `turn`, measuring its transcript with `counter`.
    pub fn measure(turn: Turn, counter: &dyn TokenCounter) -> Self {
        let length = counter.count(&turn.transcript());
        Self { turn, length }
    }

    /// Context block for this entry.
    pub fn render(&self) -> String {
        format!(
            "[Turn {} - Recent]\n{}",
            self.turn.turn_number,
            self.turn.transcript()
        )
    }
}
