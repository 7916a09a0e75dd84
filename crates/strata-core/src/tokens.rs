// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token accounting implementations.
//!
//! - [`TiktokenCounter`]: exact BPE counts using the cl100k_base vocabulary.
//! - [`WordCounter`]: whitespace word counts, cheap and dependency free.
//!
//! Both truncate by returning a prefix of the input, so a truncated text
//! never measures longer than its source.

use std::sync::Arc;

use tiktoken_rs::CoreBPE;

use crate::error::StrataError;
use crate::traits::TokenCounter;

/// Token budget for compressing `source_tokens` at `ratio`, never below one.
pub fn target_budget(source_tokens: usize, ratio: f64) -> usize {
    let scaled = (source_tokens as f64 * ratio).ceil();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as usize
    } else {
        1
    }
}

/// BPE token counter backed by `tiktoken-rs` (cl100k_base).
#[derive(Clone)]
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TiktokenCounter {
    /// Loads the cl100k_base encoding.
    pub fn cl100k() -> Result<Self, StrataError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| StrataError::Internal(format!("failed to load cl100k_base: {e}")))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_with_special_tokens(text);
        if tokens.len() <= max_tokens {
            return text.to_string();
        }

        // A cut can land inside a multi-byte character; back off until the
        // prefix decodes cleanly.
        let mut end = max_tokens;
        while end > 0 {
            if let Ok(prefix) = self.bpe.decode(tokens[..end].to_vec())
                && text.starts_with(&prefix)
            {
                return prefix;
            }
            end -= 1;
        }
        String::new()
    }
}

/// Counts whitespace-separated words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn truncate(&self, text: &str, max_tokens: usize) -> String {
        if max_tokens == 0 {
            return String::new();
        }
        let mut seen = 0;
        let mut in_word = false;
        for (idx, ch) in text.char_indices() {
            if ch.is_whitespace() {
                if in_word && seen == max_tokens {
                    return text[..idx].to_string();
                }
                in_word = false;
            } else if !in_word {
                in_word = true;
                seen += 1;
            }
        }
        text.to_string()
    }
}
