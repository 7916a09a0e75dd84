// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a memory, retriever and assembler to mock collaborators.
//!
//! Length accounting uses `WordCounter` so expected token figures can be
//! computed by hand.

use std::sync::Arc;

use strata_config::{RetrievalConfig, StrataConfig, SummarizerConfig, TierConfig};
use strata_core::{StrataError, TokenCounter, TurnInput, WordCounter};
use strata_memory::{ContextAssembler, HybridRetriever, TieredMemory, TurnReceipt};

use crate::mock_summarizer::{MockSummarizer, SummaryOutcome};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    tiers: TierConfig,
    retrieval: RetrievalConfig,
    summarizer: SummarizerConfig,
    outcomes: Vec<SummaryOutcome>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            tiers: TierConfig::default(),
            retrieval: RetrievalConfig::default(),
            summarizer: SummarizerConfig::default(),
            outcomes: Vec::new(),
        }
    }

    /// Set the three tier capacities.
    pub fn with_capacities(mut self, immediate: usize, condensed: usize, archive: usize) -> Self {
        self.tiers.immediate_capacity = immediate;
        self.tiers.condensed_capacity = condensed;
        self.tiers.archive_capacity = archive;
        self
    }

    /// Set the full tier configuration.
    pub fn with_tiers(mut self, tiers: TierConfig) -> Self {
        self.tiers = tiers;
        self
    }

    /// Set retrieval weights.
    pub fn with_retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Set the summarizer timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.summarizer.timeout_ms = timeout_ms;
        self
    }

    /// Script the mock summarizer's first outcomes.
    pub fn with_outcomes(mut self, outcomes: Vec<SummaryOutcome>) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Build the harness, validating every configuration section.
    pub fn build(self) -> Result<TestHarness, StrataError> {
        let summarizer = MockSummarizer::with_outcomes(self.outcomes);
        let counter: Arc<dyn TokenCounter> = Arc::new(WordCounter);
        let memory = Arc::new(TieredMemory::new(
            &self.tiers,
            &self.summarizer,
            Arc::new(summarizer.clone()),
            counter.clone(),
        )?);
        let retriever = HybridRetriever::new(memory.clone(), &self.retrieval)?;
        let assembler = ContextAssembler::new(memory.clone(), counter);

        let config = StrataConfig {
            tiers: self.tiers,
            retrieval: self.retrieval,
            summarizer: self.summarizer,
            ..StrataConfig::default()
        };

        Ok(TestHarness {
            memory,
            retriever,
            assembler,
            summarizer,
            config,
        })
    }
}

/// A wired memory stack backed by mocks.
pub struct TestHarness {
    pub memory: Arc<TieredMemory>,
    pub retriever: HybridRetriever,
    pub assembler: ContextAssembler,
    /// Shares its queue and call log with the summarizer inside `memory`.
    pub summarizer: MockSummarizer,
    pub config: StrataConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Ingests every turn in order, returning the receipts.
    pub async fn ingest_all(&self, turns: impl IntoIterator<Item = TurnInput>) -> Vec<TurnReceipt> {
        let mut receipts = Vec::new();
        for turn in turns {
            receipts.push(self.memory.ingest(turn).await);
        }
        receipts
    }

    /// A second memory with the same configuration and fresh mocks.
    pub fn sibling_memory(&self) -> Result<TieredMemory, StrataError> {
        TieredMemory::from_config(
            &self.config,
            Arc::new(MockSummarizer::new()),
            Arc::new(WordCounter),
        )
    }
}
