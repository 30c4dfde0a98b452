#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::float_cmp,
        clippy::cast_precision_loss
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public APIs carry docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Counts in this crate are bounded by document size, so usize → f64/u32/u64 casts are
// reviewed rather than routed through try_into().
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
//
// Readability over minor perf difference in report rendering.
#![allow(clippy::format_push_string)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Authorship-pattern analysis of `.docx` revision save identifiers (RSIDs).
//!
//! Word processors stamp each paragraph and run with the identifier of the editing session
//! that produced it. This crate extracts those stamps, aggregates them per identifier, and
//! applies a configurable heuristic that separates incremental typing from bulk insertion.
//!
//! ```no_run
//! use rsid_lens::{AnalysisOptions, ReportOutputs, analyze_path, write_reports};
//!
//! let analysis = analyze_path("essay.docx", &AnalysisOptions::default())?;
//! for row in analysis.statistics().rows {
//!     println!("{} {} {:?}", row.identifier, row.word_count, row.verdict);
//! }
//! let outputs = ReportOutputs {
//!     html: Some("rsid_report.html".into()),
//!     ..Default::default()
//! };
//! write_reports("essay.docx", &analysis, &outputs)?;
//! # Ok::<(), rsid_lens::RsidError>(())
//! ```

/// The rsid-lens crate version (matches `Cargo.toml`).
pub const RSID_LENS_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod analysis;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod types;

pub use analysis::{ClassificationOutcome, aggregate_profiles, classify_profiles, total_words};
pub use constants::*;
pub use error::{Result, RsidError, Stage};
pub use pipeline::{Analysis, analyze_bytes, analyze_path, analyze_reader, analyze_xml};
pub use reader::{
    DocxContainer, ParsedDocument, extract_part, extract_part_from_bytes, parse_document,
    parse_text_runs,
};
#[cfg(feature = "chart")]
pub use report::{render_bar_chart, render_heatmap};
pub use report::{
    Color, Palette, ReportImages, ReportOutputs, WrittenReports, render_html, statistics_csv,
    statistics_json, write_reports,
};
pub use types::{
    Advisory, AnalysisDiagnostics, AnalysisOptions, AnalysisOptionsBuilder, ClassificationVerdict,
    ClassifierConfig, RsidKey, RsidProfile, StatisticsRow, StatisticsTable, TextRun, VerdictLabel,
};
