//! End-to-end analysis of one document: extract → parse → aggregate → classify.
//!
//! Each stage consumes the fully materialized output of the previous one. Extraction and
//! parse failures return before aggregation starts, so callers never see statistics for a
//! document that failed to load.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::{aggregate_profiles, classify_profiles, total_words};
use crate::error::Result;
use crate::reader::{DocxContainer, ParsedDocument, parse_document};
use crate::types::{
    Advisory, AnalysisDiagnostics, AnalysisOptions, ClassificationVerdict, ClassifierConfig,
    RsidKey, RsidProfile, StatisticsRow, StatisticsTable, TextRun,
};

/// Complete result for one document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub runs: Vec<TextRun>,
    pub profiles: Vec<RsidProfile>,
    /// One verdict per profile, in the same order.
    pub verdicts: Vec<ClassificationVerdict>,
    pub diagnostics: AnalysisDiagnostics,
    pub paragraphs: usize,
    pub dropped_runs: usize,
}

impl Analysis {
    #[must_use]
    pub fn total_words(&self) -> usize {
        total_words(&self.runs)
    }

    #[must_use]
    pub fn profile(&self, key: &RsidKey) -> Option<&RsidProfile> {
        self.profiles.iter().find(|profile| &profile.identifier == key)
    }

    #[must_use]
    pub fn verdict(&self, key: &RsidKey) -> Option<&ClassificationVerdict> {
        self.verdicts.iter().find(|verdict| &verdict.identifier == key)
    }

    /// Flatten profiles and verdicts into the renderer-facing table.
    #[must_use]
    pub fn statistics(&self) -> StatisticsTable {
        let rows = self
            .profiles
            .iter()
            .zip(&self.verdicts)
            .map(|(profile, verdict)| StatisticsRow {
                identifier: profile.identifier.label().to_string(),
                tagged: profile.identifier.is_tagged(),
                word_count: profile.total_word_count,
                run_count: profile.run_count,
                max_contiguous_span: profile.max_contiguous_span,
                verdict: verdict.label,
                rationale: verdict.rationale.clone(),
            })
            .collect();
        StatisticsTable {
            total_runs: self.runs.len(),
            total_words: self.total_words(),
            rows,
            advisories: self.diagnostics.advisories.clone(),
        }
    }
}

fn build_analysis(parsed: ParsedDocument, config: &ClassifierConfig) -> Result<Analysis> {
    let mut diagnostics = AnalysisDiagnostics::default();
    if parsed.runs.is_empty() {
        diagnostics.record(Advisory::EmptyDocument);
    }

    let profiles = aggregate_profiles(&parsed.runs);
    let outcome = classify_profiles(&profiles, config)?;
    diagnostics.merge_from(&outcome.diagnostics);

    Ok(Analysis {
        runs: parsed.runs,
        profiles,
        verdicts: outcome.verdicts,
        diagnostics,
        paragraphs: parsed.paragraphs,
        dropped_runs: parsed.dropped_runs,
    })
}

/// Analyze raw document XML.
pub fn analyze_xml(xml: &str, config: &ClassifierConfig) -> Result<Analysis> {
    config.validate()?;
    let parsed = parse_document(xml)?;
    build_analysis(parsed, config)
}

fn analyze_container(mut container: DocxContainer, options: &AnalysisOptions) -> Result<Analysis> {
    let started = Instant::now();
    let xml = container.read_part(&options.part)?;
    // Scratch storage is released here, before any analysis work.
    drop(container);

    let analysis = analyze_xml(&xml, &options.classifier)?;
    tracing::info!(
        target = "rsid_lens::pipeline",
        part = %options.part,
        runs = analysis.runs.len(),
        identifiers = analysis.profiles.len(),
        advisories = analysis.diagnostics.advisories.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "analysis completed"
    );
    Ok(analysis)
}

/// Analyze the container at `path`.
pub fn analyze_path(path: impl AsRef<Path>, options: &AnalysisOptions) -> Result<Analysis> {
    options.classifier.validate()?;
    analyze_container(DocxContainer::open(path)?, options)
}

/// Analyze a container supplied as a byte stream; input is spooled to a scoped workspace.
pub fn analyze_reader<R: Read>(reader: R, options: &AnalysisOptions) -> Result<Analysis> {
    options.classifier.validate()?;
    analyze_container(DocxContainer::from_reader(reader)?, options)
}

pub fn analyze_bytes(bytes: &[u8], options: &AnalysisOptions) -> Result<Analysis> {
    analyze_reader(bytes, options)
}
