//! Derived per-identifier views: profiles, verdicts, and the flattened statistics table.

use serde::{Deserialize, Serialize};

use super::diagnostics::Advisory;
use super::run::RsidKey;

/// Aggregated statistics for one identifier (including the absent bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsidProfile {
    pub identifier: RsidKey,
    pub total_word_count: usize,
    pub run_count: usize,
    /// Sequence indices of the runs carrying this identifier, ascending.
    pub occurrence_positions: Vec<usize>,
    /// Word count of each occurrence, aligned with `occurrence_positions`.
    pub run_word_counts: Vec<usize>,
    /// Longest streak of adjacent runs sharing this identifier.
    pub max_contiguous_span: usize,
}

impl RsidProfile {
    /// True when every occurrence sits in a single unbroken block.
    #[must_use]
    pub fn is_single_block(&self) -> bool {
        self.max_contiguous_span == self.run_count
    }

    #[must_use]
    pub fn mean_words_per_run(&self) -> f64 {
        if self.run_count == 0 {
            0.0
        } else {
            self.total_word_count as f64 / self.run_count as f64
        }
    }
}

/// Authorship pattern inferred for an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    LikelyTyped,
    LikelyBulkInsertion,
    Inconclusive,
}

impl VerdictLabel {
    /// Stable machine-readable code, matching the serde representation.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::LikelyTyped => "likely_typed",
            Self::LikelyBulkInsertion => "likely_bulk_insertion",
            Self::Inconclusive => "inconclusive",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LikelyTyped => "likely typed",
            Self::LikelyBulkInsertion => "likely bulk insertion",
            Self::Inconclusive => "inconclusive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    pub identifier: RsidKey,
    pub label: VerdictLabel,
    pub rationale: String,
}

/// One row of the renderer-facing statistics structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRow {
    pub identifier: String,
    /// False for the absent (`NO_RSID`) bucket.
    pub tagged: bool,
    pub word_count: usize,
    pub run_count: usize,
    pub max_contiguous_span: usize,
    pub verdict: VerdictLabel,
    pub rationale: String,
}

/// `{identifier → (word_count, run_count, verdict, rationale)}` in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsTable {
    pub total_runs: usize,
    pub total_words: usize,
    pub rows: Vec<StatisticsRow>,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

impl StatisticsTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a given identifier key.
    #[must_use]
    pub fn row(&self, key: &RsidKey) -> Option<&StatisticsRow> {
        self.rows
            .iter()
            .find(|row| row.tagged == key.is_tagged() && row.identifier == key.label())
    }
}
