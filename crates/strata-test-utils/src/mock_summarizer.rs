// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock summarizer with scripted outcomes for deterministic testing.
//!
//! Outcomes are popped from a FIFO queue, one per `summarize` call. When the
//! queue is empty the mock keeps the first `target_tokens` words of the
//! input, which is a well-behaved compression under `WordCounter`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strata_core::{StrataError, Summarizer};
use tokio::sync::Mutex;

/// What the next `summarize` call does.
#[derive(Debug, Clone)]
pub enum SummaryOutcome {
    /// Return this text.
    Text(String),
    /// Fail with a compression error carrying this message.
    Fail(String),
    /// Sleep, then return this text. Pair with a short timeout to test expiry.
    Delay(Duration, String),
}

/// A recorded `summarize` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCall {
    pub text: String,
    pub target_tokens: usize,
}

/// A mock summarizer that replays pre-configured outcomes.
#[derive(Clone, Default)]
pub struct MockSummarizer {
    outcomes: Arc<Mutex<VecDeque<SummaryOutcome>>>,
    calls: Arc<Mutex<Vec<SummaryCall>>>,
}

impl MockSummarizer {
    /// Create a mock with an empty outcome queue (word-prefix behavior).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<SummaryOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            calls: Arc::default(),
        }
    }

    /// Create a mock whose first `n` calls fail.
    pub fn failing(n: usize) -> Self {
        Self::with_outcomes(
            (0..n)
                .map(|i| SummaryOutcome::Fail(format!("scripted failure {}", i + 1)))
                .collect(),
        )
    }

    /// Add an outcome to the end of the queue.
    pub async fn push_outcome(&self, outcome: SummaryOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<SummaryCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

fn keep_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str, target_tokens: usize) -> Result<String, StrataError> {
        self.calls.lock().await.push(SummaryCall {
            text: text.to_string(),
            target_tokens,
        });

        let outcome = self.outcomes.lock().await.pop_front();
        match outcome {
            None => Ok(keep_words(text, target_tokens)),
            Some(SummaryOutcome::Text(summary)) => Ok(summary),
            Some(SummaryOutcome::Fail(message)) => Err(StrataError::compression(message)),
            Some(SummaryOutcome::Delay(delay, summary)) => {
                tokio::time::sleep(delay).await;
                Ok(summary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_keeps_word_prefix() {
        let mock = MockSummarizer::new();
        let out = mock.summarize("one two three four", 2).await.unwrap();
        assert_eq!(out, "one two");
        assert_eq!(
            mock.calls().await,
            vec![SummaryCall {
                text: "one two three four".to_string(),
                target_tokens: 2
            }]
        );
    }

    #[tokio::test]
    async fn scripted_outcomes_replay_in_order() {
        let mock = MockSummarizer::with_outcomes(vec![
            SummaryOutcome::Text("first".to_string()),
            SummaryOutcome::Fail("boom".to_string()),
        ]);
        assert_eq!(mock.summarize("x", 1).await.unwrap(), "first");
        assert!(mock.summarize("x", 1).await.is_err());
        assert_eq!(mock.summarize("x y", 1).await.unwrap(), "x");
        assert_eq!(mock.call_count().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_outcome_sleeps() {
        let mock = MockSummarizer::with_outcomes(vec![SummaryOutcome::Delay(
            Duration::from_secs(30),
            "late".to_string(),
        )]);
        let start = tokio::time::Instant::now();
        assert_eq!(mock.summarize("x", 1).await.unwrap(), "late");
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn failing_helper_fails_n_times() {
        let mock = MockSummarizer::failing(2);
        assert!(mock.summarize("a", 1).await.is_err());
        assert!(mock.summarize("a", 1).await.is_err());
        assert!(mock.summarize("a", 1).await.is_ok());
    }
}
