// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strata memory workspace.

use thiserror::Error;

/// The primary error type used across Strata collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Invalid construction parameters (zero capacity, negative weight, bad ratio).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The summarizer failed to produce a usable compression.
    #[error("compression failed: {message}")]
    Compression {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A bounded external call did not finish in time.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A memory snapshot is malformed or violates a tier invariant.
    #[error("snapshot import failed: {message}")]
    ImportFormat { message: String },

    /// The query expander failed to produce clues.
    #[error("query expansion failed: {message}")]
    Expansion { message: String },

    /// Snapshot file could not be read or written.
    #[error("i/o error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Shorthand for an [`StrataError::ImportFormat`] with the given message.
    pub fn import(message: impl Into<String>) -> Self {
        StrataError::ImportFormat {
            message: message.into(),
        }
    }

    /// Shorthand for a sourceless [`StrataError::Compression`].
    pub fn compression(message: impl Into<String>) -> Self {
        StrataError::Compression {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for failures the orchestrator recovers from by truncation.
    pub fn is_recoverable_compression(&self) -> bool {
        matches!(
            self,
            StrataError::Compression { .. } | StrataError::Timeout { .. }
        )
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        StrataError::ImportFormat {
            message: err.to_string(),
        }
    }
}
