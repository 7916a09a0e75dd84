// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token counting trait used for all length accounting.

/// Deterministic, monotone length measurement.
///
/// For any text `a` and any extension `b` of `a`, `count(b) >= count(a)`.
pub trait TokenCounter: Send + Sync {
    /// Measures `text`.
    fn count(&self, text: &str) -> usize;

    /// Returns the longest prefix of `text` measuring at most `max_tokens`.
    fn truncate(&self, text: &str, max_tokens: usize) -> String;
}
