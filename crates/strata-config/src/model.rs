// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Strata tiered memory.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use strata_core::StrataError;

/// Top-level Strata configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrataConfig {
    /// Tier capacities and compression ratios.
    #[serde(default)]
    pub tiers: TierConfig,

    /// Hybrid retrieval weights.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Summarizer call settings.
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capacity and compression policy for the three memory tiers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Number of verbatim turns kept in the immediate tier.
    #[serde(default = "default_immediate_capacity")]
    pub immediate_capacity: usize,

    /// Number of compressed turns kept in the condensed tier.
    #[serde(default = "default_condensed_capacity")]
    pub condensed_capacity: usize,

    /// Number of ultra-compressed memories kept in the archive tier.
    #[serde(default = "default_archive_capacity")]
    pub archive_capacity: usize,

    /// Fraction of the source token length retained by condensed compression.
    #[serde(default = "default_condensed_ratio")]
    pub condensed_ratio: f64,

    /// Fraction of the source token length retained by archive compression.
    #[serde(default = "default_archive_ratio")]
    pub archive_ratio: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            immediate_capacity: default_immediate_capacity(),
            condensed_capacity: default_condensed_capacity(),
            archive_capacity: default_archive_capacity(),
            condensed_ratio: default_condensed_ratio(),
            archive_ratio: default_archive_ratio(),
        }
    }
}

impl TierConfig {
    /// Shorthand for tests and embedders that only care about capacities.
    pub fn with_capacities(immediate: usize, condensed: usize, archive: usize) -> Self {
        Self {
            immediate_capacity: immediate,
            condensed_capacity: condensed,
            archive_capacity: archive,
            ..Self::default()
        }
    }

    /// Collects every constraint violation as a human-readable message.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [
            ("tiers.immediate_capacity", self.immediate_capacity),
            ("tiers.condensed_capacity", self.condensed_capacity),
            ("tiers.archive_capacity", self.archive_capacity),
        ] {
            if value == 0 {
                problems.push(format!("{name} must be at least 1"));
            }
        }
        for (name, value) in [
            ("tiers.condensed_ratio", self.condensed_ratio),
            ("tiers.archive_ratio", self.archive_ratio),
        ] {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                problems.push(format!("{name} must be in (0, 1], got {value}"));
            }
        }
        problems
    }

    /// Fails with [`StrataError::InvalidConfiguration`] on the first problem.
    pub fn check(&self) -> Result<(), StrataError> {
        first_problem(self.problems())
    }
}

fn default_immediate_capacity() -> usize {
    2
}

fn default_condensed_capacity() -> usize {
    5
}

fn default_archive_capacity() -> usize {
    300
}

fn default_condensed_ratio() -> f64 {
    0.5
}

fn default_archive_ratio() -> f64 {
    0.05
}

/// Weights and decay for the hybrid relevance score.
///
/// Weights must be non-negative but need not sum to 1: only the ordering
/// of final scores matters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Weight of the word-overlap (Jaccard) component.
    #[serde(default = "default_text_weight")]
    pub text_weight: f64,

    /// Weight of the entity-overlap component.
    #[serde(default = "default_entity_weight")]
    pub entity_weight: f64,

    /// Weight of the recency component.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    /// Decay scale in turns; recency halves roughly every `scale * ln 2` turns.
    #[serde(default = "default_recency_scale")]
    pub recency_scale: f64,

    /// Default number of candidates surfaced per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            text_weight: default_text_weight(),
            entity_weight: default_entity_weight(),
            recency_weight: default_recency_weight(),
            recency_scale: default_recency_scale(),
            top_k: default_top_k(),
        }
    }
}

impl RetrievalConfig {
    /// Collects every constraint violation as a human-readable message.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [
            ("retrieval.text_weight", self.text_weight),
            ("retrieval.entity_weight", self.entity_weight),
            ("retrieval.recency_weight", self.recency_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                problems.push(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if !(self.recency_scale.is_finite() && self.recency_scale > 0.0) {
            problems.push(format!(
                "retrieval.recency_scale must be positive, got {}",
                self.recency_scale
            ));
        }
        problems
    }

    /// Fails with [`StrataError::InvalidConfiguration`] on the first problem.
    pub fn check(&self) -> Result<(), StrataError> {
        first_problem(self.problems())
    }
}

fn default_text_weight() -> f64 {
    0.4
}

fn default_entity_weight() -> f64 {
    0.3
}

fn default_recency_weight() -> f64 {
    0.3
}

fn default_recency_scale() -> f64 {
    5.0
}

fn default_top_k() -> usize {
    5
}

/// Summarizer call settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SummarizerConfig {
    /// Upper bound on a single summarize call, in milliseconds.
    /// Expiry counts as a compression failure and triggers truncation.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SummarizerConfig {
    /// The configured timeout as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    /// Collects every constraint violation as a human-readable message.
    pub fn problems(&self) -> Vec<String> {
        if self.timeout_ms == 0 {
            vec!["summarizer.timeout_ms must be at least 1".to_string()]
        } else {
            Vec::new()
        }
    }

    /// Fails with [`StrataError::InvalidConfiguration`] on the first problem.
    pub fn check(&self) -> Result<(), StrataError> {
        first_problem(self.problems())
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn first_problem(problems: Vec<String>) -> Result<(), StrataError> {
    match problems.into_iter().next() {
        Some(problem) => Err(StrataError::InvalidConfiguration(problem)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = StrataConfig::default();
        assert_eq!(config.tiers.immediate_capacity, 2);
        assert_eq!(config.tiers.condensed_capacity, 5);
        assert_eq!(config.tiers.archive_capacity, 300);
        assert_eq!(config.tiers.condensed_ratio, 0.5);
        assert_eq!(config.tiers.archive_ratio, 0.05);
        assert_eq!(config.retrieval.text_weight, 0.4);
        assert_eq!(config.retrieval.entity_weight, 0.3);
        assert_eq!(config.retrieval.recency_weight, 0.3);
        assert_eq!(config.retrieval.recency_scale, 5.0);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.summarizer.timeout_ms, 10_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let tiers = TierConfig::with_capacities(0, 5, 300);
        let err = tiers.check().unwrap_err();
        assert!(matches!(err, StrataError::InvalidConfiguration(m) if m.contains("immediate_capacity")));
    }

    #[test]
    fn ratio_must_be_in_unit_interval() {
        let mut tiers = TierConfig::default();
        tiers.archive_ratio = 0.0;
        tiers.condensed_ratio = 1.5;
        assert_eq!(tiers.problems().len(), 2);
        tiers.archive_ratio = 1.0;
        tiers.condensed_ratio = 0.5;
        assert!(tiers.check().is_ok());
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        let mut retrieval = RetrievalConfig::default();
        retrieval.entity_weight = -0.1;
        retrieval.text_weight = f64::NAN;
        assert_eq!(retrieval.problems().len(), 2);
    }

    #[test]
    fn zero_weights_are_allowed() {
        let retrieval = RetrievalConfig {
            text_weight: 0.0,
            entity_weight: 2.0,
            recency_weight: 0.0,
            ..RetrievalConfig::default()
        };
        assert!(retrieval.check().is_ok());
    }

    #[test]
    fn recency_scale_must_be_positive() {
        let retrieval = RetrievalConfig {
            recency_scale: 0.0,
            ..RetrievalConfig::default()
        };
        assert!(retrieval.check().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let summarizer = SummarizerConfig { timeout_ms: 0 };
        assert!(summarizer.check().is_err());
        assert_eq!(
            SummarizerConfig::default().timeout(),
            std::time::Duration::from_secs(10)
        );
    }
}
