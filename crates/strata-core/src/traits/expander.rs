// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query expander trait turning a raw query into retrieval clues.

use async_trait::async_trait;

use crate::error::StrataError;
use crate::types::QueryClues;

/// Turns a vague user query into search clues and an entity list.
///
/// The retriever only consumes `clues` (as query text) and `entities`;
/// how they were produced is up to the implementation.
#[async_trait]
pub trait QueryExpander: Send + Sync {
    /// Expands `query` into retrieval clues.
    async fn expand(&self, query: &str) -> Result<QueryClues, StrataError>;
}
