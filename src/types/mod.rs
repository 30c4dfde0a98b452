//! Public types exposed by the `rsid-lens` crate.

pub mod diagnostics;
pub mod options;
pub mod profile;
pub mod run;

pub use diagnostics::{Advisory, AnalysisDiagnostics};
pub use options::{AnalysisOptions, AnalysisOptionsBuilder, ClassifierConfig};
pub use profile::{
    ClassificationVerdict, RsidProfile, StatisticsRow, StatisticsTable, VerdictLabel,
};
pub use run::{RsidKey, TextRun};
