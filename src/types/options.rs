//! Tunable options for an analysis run.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DOCUMENT_PART;
use crate::error::{Result, RsidError};

fn default_median_multiple() -> f64 {
    3.0
}

fn default_max_bulk_run_count() -> usize {
    2
}

fn default_min_identifiers() -> usize {
    3
}

fn default_max_run_word_variation() -> f64 {
    1.0
}

fn default_part() -> String {
    DEFAULT_DOCUMENT_PART.to_string()
}

/// Thresholds for the typing-pattern heuristic.
///
/// None of these are universal constants; an analyst is expected to justify the values used
/// for a given corpus, which is why every one of them is serde-configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// An identifier's word total must exceed this multiple of the median per-identifier
    /// total to count as bulk. Also bounds per-occurrence size for typed sessions.
    #[serde(default = "default_median_multiple")]
    pub median_multiple: f64,
    /// Largest run count still considered a single insertion.
    #[serde(default = "default_max_bulk_run_count")]
    pub max_bulk_run_count: usize,
    /// Minimum number of tagged identifiers before any verdict other than inconclusive.
    #[serde(default = "default_min_identifiers")]
    pub min_identifiers: usize,
    /// Ceiling on the coefficient of variation of per-occurrence word counts for a
    /// session to read as uniform typing.
    #[serde(default = "default_max_run_word_variation")]
    pub max_run_word_variation: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            median_multiple: default_median_multiple(),
            max_bulk_run_count: default_max_bulk_run_count(),
            min_identifiers: default_min_identifiers(),
            max_run_word_variation: default_max_run_word_variation(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.median_multiple.is_finite() || self.median_multiple <= 0.0 {
            return Err(RsidError::InvalidConfig {
                reason: format!(
                    "median_multiple must be a positive number, got {}",
                    self.median_multiple
                )
                .into(),
            });
        }
        if !self.max_run_word_variation.is_finite() || self.max_run_word_variation < 0.0 {
            return Err(RsidError::InvalidConfig {
                reason: format!(
                    "max_run_word_variation must be non-negative, got {}",
                    self.max_run_word_variation
                )
                .into(),
            });
        }
        if self.max_bulk_run_count == 0 {
            return Err(RsidError::InvalidConfig {
                reason: "max_bulk_run_count must be at least 1".into(),
            });
        }
        if self.min_identifiers == 0 {
            return Err(RsidError::InvalidConfig {
                reason: "min_identifiers must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Options for a single-document analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Container member holding the document body.
    #[serde(default = "default_part")]
    pub part: String,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            part: default_part(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AnalysisOptions {
    #[must_use]
    pub fn builder() -> AnalysisOptionsBuilder {
        AnalysisOptionsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptionsBuilder {
    inner: AnalysisOptions,
}

impl AnalysisOptionsBuilder {
    pub fn part<S: Into<String>>(mut self, part: S) -> Self {
        self.inner.part = part.into();
        self
    }

    #[must_use]
    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.inner.classifier = classifier;
        self
    }

    #[must_use]
    pub fn median_multiple(mut self, multiple: f64) -> Self {
        self.inner.classifier.median_multiple = multiple;
        self
    }

    #[must_use]
    pub fn max_bulk_run_count(mut self, count: usize) -> Self {
        self.inner.classifier.max_bulk_run_count = count;
        self
    }

    #[must_use]
    pub fn min_identifiers(mut self, count: usize) -> Self {
        self.inner.classifier.min_identifiers = count;
        self
    }

    #[must_use]
    pub fn build(self) -> AnalysisOptions {
        self.inner
    }
}
