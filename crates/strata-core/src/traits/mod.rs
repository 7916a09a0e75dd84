// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The memory core depends on three narrow capabilities supplied from
//! outside: compression, query expansion, and length measurement. Async
//! collaborators use `#[async_trait]` for dynamic dispatch compatibility.

pub mod expander;
pub mod summarizer;
pub mod tokenizer;

pub use expander::QueryExpander;
pub use summarizer::Summarizer;
pub use tokenizer::TokenCounter;
