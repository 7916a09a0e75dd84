// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded summarizer calls with deterministic truncation fallback.

use std::sync::Arc;
use std::time::Duration;

use strata_core::{target_budget, StrataError, Summarizer, TierKind, TokenCounter, TurnNumber};
use tracing::{debug, error, warn};

use crate::types::Compression;

/// Compresses tier text toward a ratio of its length.
///
/// Never fails: summarizer errors, timeouts and blank output all fall back
/// to a prefix truncation of the source at the target budget.
#[derive(Clone)]
pub struct Compressor {
    summarizer: Arc<dyn Summarizer>,
    counter: Arc<dyn TokenCounter>,
    timeout: Duration,
}

impl Compressor {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        counter: Arc<dyn TokenCounter>,
        timeout: Duration,
    ) -> Self {
        Self {
            summarizer,
            counter,
            timeout,
        }
    }

    /// Compresses `source` for placement in `tier`.
    pub async fn compress(
        &self,
        tier: TierKind,
        turn_number: TurnNumber,
        source: &str,
        ratio: f64,
    ) -> Compression {
        let source_tokens = self.counter.count(source);
        let budget = target_budget(source_tokens, ratio);

        match self.summarize(source, budget).await {
            Ok(text) => {
                let length = self.counter.count(&text);
                debug!(%tier, turn_number, source_tokens, budget, length, "compressed turn");
                Compression {
                    text,
                    length,
                    fallback: false,
                }
            }
            Err(err) => {
                if err.is_recoverable_compression() {
                    warn!(%tier, turn_number, error = %err, "summarizer failed, truncating");
                } else {
                    error!(%tier, turn_number, error = %err, "unexpected summarizer error, truncating");
                }
                metrics::counter!(
                    "strata_memory_compression_fallbacks_total",
                    "tier" => tier.to_string()
                )
                .increment(1);

                let text = self.counter.truncate(source, budget);
                let length = self.counter.count(&text);
                Compression {
                    text,
                    length,
                    fallback: true,
                }
            }
        }
    }

    async fn summarize(&self, source: &str, budget: usize) -> Result<String, StrataError> {
        let text = tokio::time::timeout(self.timeout, self.summarizer.summarize(source, budget))
            .await
            .map_err(|_| StrataError::Timeout {
                duration: self.timeout,
            })??;

        if text.trim().is_empty() {
            return Err(StrataError::compression("summarizer returned empty text"));
        }
        Ok(text)
    }

    pub fn counter(&self) -> &Arc<dyn TokenCounter> {
        &self.counter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for Compressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compressor")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use strata_core::WordCounter;

    struct Fixed(Result<&'static str, &'static str>);

    #[async_trait]
    impl Summarizer for Fixed {
        async fn summarize(&self, _text: &str, _target: usize) -> Result<String, StrataError> {
            self.0
                .map(str::to_string)
                .map_err(StrataError::compression)
        }
    }

    struct Stalled;

    #[async_trait]
    impl Summarizer for Stalled {
        async fn summarize(&self, _text: &str, _target: usize) -> Result<String, StrataError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    fn compressor(summarizer: impl Summarizer + 'static) -> Compressor {
        Compressor::new(
            Arc::new(summarizer),
            Arc::new(WordCounter),
            Duration::from_millis(50),
        )
    }

    const SOURCE: &str = "User: what was Q3 revenue\nAssistant: Q3 revenue was six million dollars";

    #[tokio::test]
    async fn summarizer_output_is_recorded_with_its_length() {
        let out = compressor(Fixed(Ok("Q3 revenue $6M")))
            .compress(TierKind::Condensed, 1, SOURCE, 0.5)
            .await;
        assert_eq!(out.text, "Q3 revenue $6M");
        assert_eq!(out.length, 3);
        assert!(!out.fallback);
    }

    #[tokio::test]
    async fn failure_falls_back_to_truncation() {
        let out = compressor(Fixed(Err("model offline")))
            .compress(TierKind::Condensed, 1, SOURCE, 0.5)
            .await;
        // 12 words at 0.5 -> 6 words
        assert_eq!(out.text, "User: what was Q3 revenue\nAssistant:");
        assert_eq!(out.length, 6);
        assert!(out.fallback);
    }

    #[tokio::test]
    async fn whitespace_output_counts_as_failure() {
        let out = compressor(Fixed(Ok("   \n")))
            .compress(TierKind::Archive, 1, SOURCE, 0.05)
            .await;
        assert!(out.fallback);
        assert_eq!(out.text, "User:");
        assert_eq!(out.length, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back_to_truncation() {
        let out = compressor(Stalled)
            .compress(TierKind::Condensed, 2, SOURCE, 0.5)
            .await;
        assert!(out.fallback);
        assert!(SOURCE.starts_with(&out.text));
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn fallback_is_logged_at_warn() {
        compressor(Fixed(Err("quota exceeded")))
            .compress(TierKind::Condensed, 7, SOURCE, 0.5)
            .await;
        assert!(logs_contain("summarizer failed, truncating"));
        assert!(logs_contain("quota exceeded"));
    }
}
