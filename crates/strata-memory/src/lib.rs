// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered session memory for the Strata workspace.
//!
//! Keeps a bounded record of a long-running conversation in three tiers and
//! ranks older turns for recall, so only a small relevant slice of history
//! has to be handed to a generator on each turn.
//!
//! ## Architecture
//!
//! - **TieredMemory**: Owns the tiers and drives the promotion cascade
//! - **Tiers**: Immediate (verbatim), Condensed (compressed), Archive (ultra-compressed, indexed)
//! - **EntityIndex**: Entity to archive-id lookup, maintained by the archive
//! - **Compressor**: Timeout-bounded summarizer calls with truncation fallback
//! - **HybridRetriever**: Textual + entity + recency scoring over condensed and archive
//! - **ContextAssembler**: Prompt document from recent context and retrieved turns
//! - **KeywordExpander** / **KeyFactSummarizer**: Deterministic collaborators
//! - **MemorySnapshot**: Validated JSON export/import of the complete state

pub mod assembler;
pub mod compressor;
pub mod entity_index;
pub mod expander;
pub mod orchestrator;
pub mod retriever;
pub mod scoring;
pub mod snapshot;
pub mod summarizer;
pub mod tiers;
pub mod types;

pub use assembler::{ContextAssembler, ContextStats};
pub use compressor::Compressor;
pub use entity_index::EntityIndex;
pub use expander::{extract_entities, parse_clue_response, KeywordExpander};
pub use orchestrator::TieredMemory;
pub use retriever::HybridRetriever;
pub use snapshot::MemorySnapshot;
pub use summarizer::KeyFactSummarizer;
pub use types::*;
