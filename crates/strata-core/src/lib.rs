// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strata tiered session memory.
//!
//! This crate provides the collaborator traits, error type, shared turn
//! types and token accounting used throughout the Strata workspace. Any
//! summarizer, query expander or tokenizer plugs in through the traits
//! defined here.

pub mod error;
pub mod tokens;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StrataError;
pub use tokens::{target_budget, TiktokenCounter, WordCounter};
pub use types::{
    normalize_entity, ArchiveId, QueryClues, TierKind, Turn, TurnInput, TurnNumber,
};

// Re-export all collaborator traits at crate root.
pub use traits::{QueryExpander, Summarizer, TokenCounter};
