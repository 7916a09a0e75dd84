// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strata integration tests.
//!
//! Provides mock collaborators and a harness for fast, deterministic tests
//! without a model-backed summarizer or expander.
//!
//! # Components
//!
//! - [`MockSummarizer`] - Summarizer with scripted text, failure and delay outcomes
//! - [`MockExpander`] - Query expander with pre-configured clues
//! - [`TestHarness`] - Memory, retriever and assembler wired to the mocks
//! - [`fixtures`] - Canned conversations

pub mod fixtures;
pub mod harness;
pub mod mock_expander;
pub mod mock_summarizer;

pub use harness::TestHarness;
pub use mock_expander::MockExpander;
pub use mock_summarizer::{MockSummarizer, SummaryCall, SummaryOutcome};
