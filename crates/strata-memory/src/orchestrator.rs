// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The memory orchestrator: owns the tiers and drives the promotion cascade.
//!
//! Writers (`ingest`, `import`) are serialized by an async mutex. An ingest
//! first plans the cascade, awaiting the summarizer for every entry that
//! will move, and then commits all tier mutations in one synchronous step
//! under the state write lock. Readers therefore only ever observe
//! pre-cascade or post-cascade state, and a dropped ingest leaves no trace.

use std::path::Path;
use std::sync::Arc;

use strata_config::{StrataConfig, SummarizerConfig, TierConfig};
use strata_core::{StrataError, Summarizer, TierKind, TokenCounter, Turn, TurnInput, TurnNumber};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::compressor::Compressor;
use crate::snapshot::MemorySnapshot;
use crate::tiers::{ArchiveTier, CondensedTier, ImmediateTier};
use crate::types::{
    ArchivedMemory, Candidate, CascadeDepth, Compression, CondensedEntry, ImmediateEntry,
    MemoryStats, TierStats, TurnReceipt,
};

/// All mutable state, guarded by one lock.
#[derive(Debug)]
struct TierState {
    turn_count: TurnNumber,
    immediate: ImmediateTier,
    condensed: CondensedTier,
    archive: ArchiveTier,
}

impl TierState {
    fn empty(config: &TierConfig) -> Self {
        Self {
            turn_count: 0,
            immediate: ImmediateTier::new(config.immediate_capacity),
            condensed: CondensedTier::new(config.condensed_capacity),
            archive: ArchiveTier::new(config.archive_capacity),
        }
    }
}

/// Everything an ingest will write, computed before taking the write lock.
struct CascadePlan {
    entry: ImmediateEntry,
    condensed: Option<CondensedEntry>,
    archived: Option<(CondensedEntry, Compression)>,
    archive_full: bool,
}

impl CascadePlan {
    fn depth(&self) -> CascadeDepth {
        match (&self.condensed, &self.archived) {
            (None, _) => CascadeDepth::Stored,
            (Some(_), None) => CascadeDepth::Condensed,
            (Some(_), Some(_)) if self.archive_full => CascadeDepth::Discarded,
            (Some(_), Some(_)) => CascadeDepth::Archived,
        }
    }

    fn fallback_used(&self) -> bool {
        self.condensed.as_ref().is_some_and(|c| c.fallback)
            || self.archived.as_ref().is_some_and(|(_, c)| c.fallback)
    }
}

/// Three-tier session memory.
pub struct TieredMemory {
    config: TierConfig,
    compressor: Compressor,
    writer: Mutex<()>,
    state: RwLock<TierState>,
}

impl TieredMemory {
    /// Creates an empty memory, validating capacities, ratios and timeout.
    pub fn new(
        tiers: &TierConfig,
        summarizer_config: &SummarizerConfig,
        summarizer: Arc<dyn Summarizer>,
        counter: Arc<dyn TokenCounter>,
    ) -> Result<Self, StrataError> {
        tiers.check()?;
        summarizer_config.check()?;
        Ok(Self {
            config: tiers.clone(),
            compressor: Compressor::new(summarizer, counter, summarizer_config.timeout()),
            writer: Mutex::new(()),
            state: RwLock::new(TierState::empty(tiers)),
        })
    }

    /// Creates an empty memory from the `[tiers]` and `[summarizer]` sections.
    pub fn from_config(
        config: &StrataConfig,
        summarizer: Arc<dyn Summarizer>,
        counter: Arc<dyn TokenCounter>,
    ) -> Result<Self, StrataError> {
        Self::new(&config.tiers, &config.summarizer, summarizer, counter)
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Records a finished turn and runs the promotion cascade to completion.
    ///
    /// Never fails: compression problems fall back to truncation.
    pub async fn ingest(&self, input: TurnInput) -> TurnReceipt {
        let _writer = self.writer.lock().await;

        let plan = self.plan(input).await;
        let receipt = TurnReceipt {
            turn_number: plan.entry.turn.turn_number,
            cascade: plan.depth(),
            fallback_used: plan.fallback_used(),
        };

        let mut state = self.state.write().await;
        Self::commit(&mut state, plan);
        drop(state);

        metrics::counter!("strata_memory_turns_ingested_total").increment(1);
        debug!(
            turn_number = receipt.turn_number,
            cascade = ?receipt.cascade,
            fallback = receipt.fallback_used,
            "turn ingested"
        );
        receipt
    }

    /// Compresses every entry the next ingest will move, without mutating state.
    async fn plan(&self, input: TurnInput) -> CascadePlan {
        let (turn_number, leaving_immediate, leaving_condensed, archive_full) = {
            let state = self.state.read().await;
            (
                state.turn_count + 1,
                state.immediate.next_eviction().cloned(),
                state.condensed.next_eviction().cloned(),
                state.archive.is_full(),
            )
        };

        let turn = Turn::from_input(turn_number, input);
        let entry = ImmediateEntry::measure(turn, self.compressor.counter().as_ref());

        let Some(leaving_immediate) = leaving_immediate else {
            return CascadePlan {
                entry,
                condensed: None,
                archived: None,
                archive_full,
            };
        };

        let compression = self
            .compressor
            .compress(
                TierKind::Condensed,
                leaving_immediate.turn.turn_number,
                &leaving_immediate.turn.transcript(),
                self.config.condensed_ratio,
            )
            .await;
        let condensed = CondensedEntry::from_evicted(&leaving_immediate, compression);

        let archived = match leaving_condensed {
            Some(leaving) => {
                let ultra = self
                    .compressor
                    .compress(
                        TierKind::Archive,
                        leaving.turn_number,
                        &leaving.compressed_text,
                        self.config.archive_ratio,
                    )
                    .await;
                Some((leaving, ultra))
            }
            None => None,
        };

        CascadePlan {
            entry,
            condensed: Some(condensed),
            archived,
            archive_full,
        }
    }

    /// Applies a plan. Runs synchronously under the write lock.
    ///
    /// The writer mutex guarantees the tiers have not moved since planning,
    /// so every eviction here matches the entry the plan compressed.
    fn commit(state: &mut TierState, plan: CascadePlan) {
        state.turn_count = plan.entry.turn.turn_number;

        let evicted = state.immediate.push(plan.entry);
        let (Some(evicted), Some(condensed)) = (evicted, plan.condensed) else {
            return;
        };
        debug_assert_eq!(evicted.turn.turn_number, condensed.turn_number);
        metrics::counter!("strata_memory_promotions_total", "tier" => TierKind::Condensed.to_string())
            .increment(1);
        debug!(turn_number = condensed.turn_number, "promoted to condensed");

        let leaving = state.condensed.push(condensed);
        let (Some(leaving), Some((source, ultra))) = (leaving, plan.archived) else {
            return;
        };
        debug_assert_eq!(leaving.turn_number, source.turn_number);
        metrics::counter!("strata_memory_promotions_total", "tier" => TierKind::Archive.to_string())
            .increment(1);

        let (id, discarded) = state.archive.insert(&source, ultra);
        debug!(turn_number = source.turn_number, archive_id = id, "archived");

        if let Some(discarded) = discarded {
            metrics::counter!("strata_memory_evictions_total").increment(1);
            debug!(
                turn_number = discarded.turn_number,
                archive_id = discarded.id,
                "discarded from archive"
            );
        }
    }

    /// Immediate entries verbatim, then condensed summaries, each oldest first.
    pub async fn recent_context(&self) -> String {
        let state = self.state.read().await;
        let mut sections = Vec::new();

        if !state.immediate.is_empty() {
            let blocks: Vec<String> = state.immediate.entries().map(ImmediateEntry::render).collect();
            sections.push(format!("## Immediate Context\n\n{}", blocks.join("\n\n")));
        }
        if !state.condensed.is_empty() {
            let blocks: Vec<String> = state.condensed.entries().map(CondensedEntry::render).collect();
            sections.push(format!("## Condensed Context\n\n{}", blocks.join("\n\n")));
        }

        sections.join("\n\n")
    }

    pub async fn stats(&self) -> MemoryStats {
        let state = self.state.read().await;
        let immediate = TierStats {
            occupancy: state.immediate.len(),
            capacity: state.immediate.capacity(),
            tokens: state.immediate.total_tokens(),
        };
        let condensed = TierStats {
            occupancy: state.condensed.len(),
            capacity: state.condensed.capacity(),
            tokens: state.condensed.total_tokens(),
        };
        let archive = TierStats {
            occupancy: state.archive.len(),
            capacity: state.archive.capacity(),
            tokens: state.archive.total_tokens(),
        };
        MemoryStats {
            turn_count: state.turn_count,
            immediate,
            condensed,
            archive,
            total_active_tokens: immediate.tokens + condensed.tokens,
            distinct_entities: state.archive.index().len(),
        }
    }

    /// Number of turns ingested so far.
    pub async fn turn_count(&self) -> TurnNumber {
        self.state.read().await.turn_count
    }

    /// Every retrievable entry: condensed first, then archive, oldest first within each.
    pub async fn candidates(&self) -> Vec<Candidate> {
        let state = self.state.read().await;
        state
            .condensed
            .entries()
            .map(Candidate::from)
            .chain(state.archive.memories().map(Candidate::from))
            .collect()
    }

    /// Archived memories listing `entity` (via the index), then condensed matches.
    pub async fn search_by_entity(&self, entity: &str) -> Vec<Candidate> {
        let state = self.state.read().await;
        state
            .archive
            .search_entity(entity)
            .into_iter()
            .map(Candidate::from)
            .chain(state.condensed.search_entity(entity).into_iter().map(Candidate::from))
            .collect()
    }

    /// All archived memories, oldest first.
    pub async fn archived_memories(&self) -> Vec<ArchivedMemory> {
        self.state.read().await.archive.memories().cloned().collect()
    }

    /// The `n` most recently archived memories, newest first.
    pub async fn recent_archive(&self, n: usize) -> Vec<ArchivedMemory> {
        self.state
            .read()
            .await
            .archive
            .recent(n)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Turn numbers resident in each tier: (immediate, condensed, archive).
    pub async fn tier_turns(&self) -> (Vec<TurnNumber>, Vec<TurnNumber>, Vec<TurnNumber>) {
        let state = self.state.read().await;
        (
            state.immediate.turn_numbers(),
            state.condensed.turn_numbers(),
            state.archive.turn_numbers(),
        )
    }

    /// Captures the complete state as one consistent snapshot.
    pub async fn export(&self) -> MemorySnapshot {
        let state = self.state.read().await;
        MemorySnapshot {
            turn_count: state.turn_count,
            next_archive_id: state.archive.next_id(),
            immediate: state.immediate.entries().cloned().collect(),
            condensed: state.condensed.entries().cloned().collect(),
            archive: state.archive.memories().cloned().collect(),
            entity_index: state.archive.index().to_map(),
        }
    }

    /// Replaces the complete state with `snapshot`.
    ///
    /// The snapshot is validated first; on error the current state is untouched.
    pub async fn import(&self, snapshot: MemorySnapshot) -> Result<(), StrataError> {
        snapshot.validate(&self.config)?;
        let _writer = self.writer.lock().await;

        let restored = TierState {
            turn_count: snapshot.turn_count,
            immediate: ImmediateTier::restore(self.config.immediate_capacity, snapshot.immediate),
            condensed: CondensedTier::restore(self.config.condensed_capacity, snapshot.condensed),
            archive: ArchiveTier::restore(
                self.config.archive_capacity,
                snapshot.next_archive_id,
                snapshot.archive,
            ),
        };
        let mut state = self.state.write().await;
        *state = restored;

        info!(
            turn_count = state.turn_count,
            immediate = state.immediate.len(),
            condensed = state.condensed.len(),
            archive = state.archive.len(),
            "memory snapshot imported"
        );
        Ok(())
    }

    /// Writes the snapshot to `path` as pretty JSON.
    pub async fn export_to_path(&self, path: &Path) -> Result<(), StrataError> {
        let snapshot = self.export().await;
        let json = snapshot.to_json()?;
        tokio::fs::write(path, json).await?;
        info!(
            path = %path.display(),
            turn_count = snapshot.turn_count,
            "memory snapshot exported"
        );
        Ok(())
    }

    /// Reads a JSON snapshot from `path` and imports it.
    pub async fn import_from_path(&self, path: &Path) -> Result<(), StrataError> {
        let json = tokio::fs::read_to_string(path).await?;
        let snapshot = MemorySnapshot::from_json(&json)?;
        self.import(snapshot).await
    }
}

impl std::fmt::Debug for TieredMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredMemory")
            .field("config", &self.config)
            .field("compressor", &self.compressor)
            .finish_non_exhaustive()
    }
}
