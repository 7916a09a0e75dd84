// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summarizer trait for tier compression.

use async_trait::async_trait;

use crate::error::StrataError;

/// Compresses text toward a token budget.
///
/// The result does not have to hit the budget exactly; callers record
/// whatever length comes back. Errors are expected and recoverable: the
/// memory tiers fall back to deterministic truncation.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes `text` into roughly `target_tokens` tokens.
    async fn summarize(&self, text: &str, target_tokens: usize) -> Result<String, StrataError>;
}
