//! Recoverable conditions surfaced alongside a completed analysis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions that degrade the result without aborting the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Advisory {
    /// No run carried visible text. The report is still rendered, just empty.
    #[error("document contains no usable text runs")]
    EmptyDocument,

    /// Too few tagged identifiers to classify; every verdict is inconclusive.
    #[error(
        "only {identifiers} tagged identifier(s) found, {required} required for classification"
    )]
    InsufficientSampleForClassification { identifiers: usize, required: usize },
}

/// Advisories collected over one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDiagnostics {
    pub advisories: Vec<Advisory>,
}

impl AnalysisDiagnostics {
    pub fn record(&mut self, advisory: Advisory) {
        tracing::warn!(target = "rsid_lens::analysis", advisory = %advisory);
        self.advisories.push(advisory);
    }

    #[must_use]
    pub fn has(&self, advisory: &Advisory) -> bool {
        self.advisories.contains(advisory)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }

    pub fn merge_from(&mut self, other: &AnalysisDiagnostics) {
        self.advisories.extend(other.advisories.iter().cloned());
    }
}
