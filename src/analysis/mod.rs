//! Per-identifier statistics and the typing-pattern heuristic built on them.

pub mod aggregate;
pub mod classify;

pub use aggregate::{aggregate_profiles, total_words};
pub use classify::{ClassificationOutcome, classify_profiles};
