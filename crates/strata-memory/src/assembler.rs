// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Packages recent context, retrieved turns and the current query into one
//! prompt document for a downstream generator.

use std::sync::Arc;

use serde::Serialize;
use strata_core::TokenCounter;

use crate::orchestrator::TieredMemory;
use crate::types::ScoredCandidate;

const SYSTEM_INSTRUCTIONS: &str = "# System Instructions
You are a helpful assistant with access to the full conversation history through:
- Recent context (last few turns, verbatim or compressed)
- Past context (relevant earlier turns, retrieved and compressed)

When answering:
1. Reference specific turns when appropriate (e.g. \"As mentioned in Turn 5...\")
2. Synthesize information from multiple turns if needed
3. If information is not in the context, say so clearly
4. Be concise but comprehensive";

const CLOSING_INSTRUCTION: &str =
    "Generate a helpful, accurate response using the provided context.";

/// Size of an assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub tokens: usize,
    pub characters: usize,
    pub lines: usize,
}

/// Builds prompt documents from a [`TieredMemory`].
pub struct ContextAssembler {
    memory: Arc<TieredMemory>,
    counter: Arc<dyn TokenCounter>,
}

impl ContextAssembler {
    pub fn new(memory: Arc<TieredMemory>, counter: Arc<dyn TokenCounter>) -> Self {
        Self { memory, counter }
    }

    /// Assembles the full prompt for `user_query`.
    pub async fn assemble(
        &self,
        user_query: &str,
        retrieved: &[ScoredCandidate],
        include_stats: bool,
    ) -> String {
        let mut parts = vec![SYSTEM_INSTRUCTIONS.to_string()];

        let recent = self.memory.recent_context().await;
        if !recent.trim().is_empty() {
            parts.push(format!("# Recent Conversation\n\n{recent}"));
        }

        if !retrieved.is_empty() {
            let blocks: Vec<String> = retrieved
                .iter()
                .map(|hit| {
                    format!(
                        "[Turn {} - Retrieved from {}]\n{}",
                        hit.candidate.turn_number, hit.candidate.source, hit.candidate.text
                    )
                })
                .collect();
            parts.push(format!("# Relevant Past Context\n\n{}", blocks.join("\n\n")));
        }

        if include_stats {
            let stats = self.memory.stats().await;
            parts.push(format!(
                "# Memory Stats\nTotal conversation turns: {}\nActive context tokens: {}",
                stats.turn_count, stats.total_active_tokens
            ));
        }

        parts.push(format!(
            "# Current User Query\nUser: \"{user_query}\"\n\n{CLOSING_INSTRUCTION}"
        ));
        parts.join("\n\n")
    }

    /// Measures an assembled document.
    pub fn context_stats(&self, assembled: &str) -> ContextStats {
        ContextStats {
            tokens: self.counter.count(assembled),
            characters: assembled.chars().count(),
            lines: assembled.matches('\n').count() + 1,
        }
    }
}
