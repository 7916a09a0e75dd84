// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock query expander returning pre-configured clues.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use strata_core::{QueryClues, QueryExpander, StrataError};
use tokio::sync::Mutex;

/// Pops queued results; when empty, echoes the query with no entities.
#[derive(Clone, Default)]
pub struct MockExpander {
    responses: Arc<Mutex<VecDeque<Result<QueryClues, String>>>>,
}

impl MockExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an expander pre-loaded with the given clues.
    pub fn with_clues(clues: Vec<QueryClues>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(clues.into_iter().map(Ok).collect())),
        }
    }

    /// Queue a failure for the next call.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }
}

#[async_trait]
impl QueryExpander for MockExpander {
    async fn expand(&self, query: &str) -> Result<QueryClues, StrataError> {
        match self.responses.lock().await.pop_front() {
            Some(Ok(clues)) => Ok(clues),
            Some(Err(message)) => Err(StrataError::Expansion { message }),
            None => Ok(QueryClues::from_query(query, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_then_echoes() {
        let expander = MockExpander::with_clues(vec![QueryClues::from_query(
            "Q3 revenue",
            vec!["Q3".to_string()],
        )]);
        expander.push_failure("offline").await;

        assert_eq!(expander.expand("vague").await.unwrap().clues, "Q3 revenue");
        assert!(matches!(
            expander.expand("vague").await,
            Err(StrataError::Expansion { .. })
        ));
        let echo = expander.expand("vague").await.unwrap();
        assert_eq!(echo.clues, "vague");
        assert!(echo.entities.is_empty());
    }
}
