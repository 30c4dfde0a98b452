//! Typing-pattern heuristic over aggregated identifier profiles.
//!
//! Raw word count alone does not separate a pasted block from a long typing session, so the
//! policy looks at shape as well as magnitude:
//!
//! - **bulk insertion**: few runs, a word total well above the document's median identifier,
//!   and every occurrence in one unbroken block;
//! - **typed**: occurrences interleaved with other identifiers, each occurrence small relative
//!   to the document's median run and roughly uniform in size;
//! - anything else is inconclusive, and the rationale names the unmet condition.

use crate::error::Result;
use crate::types::{
    Advisory, AnalysisDiagnostics, ClassificationVerdict, ClassifierConfig, RsidKey, RsidProfile,
    VerdictLabel,
};

/// Verdicts plus any advisories raised while classifying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationOutcome {
    pub verdicts: Vec<ClassificationVerdict>,
    pub diagnostics: AnalysisDiagnostics,
}

impl ClassificationOutcome {
    #[must_use]
    pub fn verdict(&self, key: &RsidKey) -> Option<&ClassificationVerdict> {
        self.verdicts.iter().find(|verdict| &verdict.identifier == key)
    }
}

/// Document-wide reference values the per-identifier thresholds are relative to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    tagged_identifiers: usize,
    median_identifier_words: f64,
    median_run_words: f64,
}

impl Baseline {
    fn from_profiles(profiles: &[RsidProfile]) -> Self {
        let tagged = profiles.iter().filter(|p| p.identifier.is_tagged());
        let mut totals: Vec<usize> = tagged.clone().map(|p| p.total_word_count).collect();
        let mut per_run: Vec<usize> = tagged
            .flat_map(|p| p.run_word_counts.iter().copied())
            .collect();
        Self {
            tagged_identifiers: totals.len(),
            median_identifier_words: median(&mut totals),
            median_run_words: median(&mut per_run),
        }
    }
}

fn median(values: &mut [usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    } else {
        values[mid] as f64
    }
}

/// Population coefficient of variation; zero for empty or all-zero input.
fn coefficient_of_variation(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt() / mean
}

/// Label every profile. Returns an error only when `config` fails validation.
pub fn classify_profiles(
    profiles: &[RsidProfile],
    config: &ClassifierConfig,
) -> Result<ClassificationOutcome> {
    config.validate()?;
    let baseline = Baseline::from_profiles(profiles);
    let mut diagnostics = AnalysisDiagnostics::default();

    let sufficient = baseline.tagged_identifiers >= config.min_identifiers;
    if !sufficient && !profiles.is_empty() {
        diagnostics.record(Advisory::InsufficientSampleForClassification {
            identifiers: baseline.tagged_identifiers,
            required: config.min_identifiers,
        });
    }

    let verdicts = profiles
        .iter()
        .map(|profile| {
            if !profile.identifier.is_tagged() {
                inconclusive(
                    profile,
                    "runs carry no session identifier, so they cannot be attributed to a session"
                        .to_string(),
                )
            } else if !sufficient {
                inconclusive(
                    profile,
                    format!(
                        "classification withheld: {} tagged identifier(s), minimum sample is {}",
                        baseline.tagged_identifiers, config.min_identifiers
                    ),
                )
            } else {
                judge(profile, &baseline, config)
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        target = "rsid_lens::classify",
        identifiers = verdicts.len(),
        bulk = verdicts
            .iter()
            .filter(|v| v.label == VerdictLabel::LikelyBulkInsertion)
            .count(),
        typed = verdicts
            .iter()
            .filter(|v| v.label == VerdictLabel::LikelyTyped)
            .count(),
        median_identifier_words = baseline.median_identifier_words,
        "profiles classified"
    );

    Ok(ClassificationOutcome {
        verdicts,
        diagnostics,
    })
}

fn inconclusive(profile: &RsidProfile, rationale: String) -> ClassificationVerdict {
    ClassificationVerdict {
        identifier: profile.identifier.clone(),
        label: VerdictLabel::Inconclusive,
        rationale,
    }
}

fn judge(
    profile: &RsidProfile,
    baseline: &Baseline,
    config: &ClassifierConfig,
) -> ClassificationVerdict {
    let words = profile.total_word_count;
    let runs = profile.run_count;
    let span = profile.max_contiguous_span;

    let bulk_threshold = config.median_multiple * baseline.median_identifier_words;
    let few_runs = runs <= config.max_bulk_run_count;
    let large = words as f64 > bulk_threshold;
    let single_block = profile.is_single_block();

    if few_runs && large && single_block {
        return ClassificationVerdict {
            identifier: profile.identifier.clone(),
            label: VerdictLabel::LikelyBulkInsertion,
            rationale: format!(
                "{words} words in {runs} run(s) forming one unbroken block; exceeds {:.1}x the \
                 median of {:.1} words per identifier (threshold {bulk_threshold:.1})",
                config.median_multiple, baseline.median_identifier_words
            ),
        };
    }

    let run_cap = config.median_multiple * baseline.median_run_words;
    let interleaved = span < runs;
    let largest_run = profile.run_word_counts.iter().copied().max().unwrap_or(0);
    let small = largest_run as f64 <= run_cap;
    let variation = coefficient_of_variation(&profile.run_word_counts);
    let uniform = variation <= config.max_run_word_variation;

    if interleaved && small && uniform {
        return ClassificationVerdict {
            identifier: profile.identifier.clone(),
            label: VerdictLabel::LikelyTyped,
            rationale: format!(
                "{runs} runs interleaved with other identifiers (longest block {span}); mean \
                 {:.1} words per run, largest run {largest_run} words within {run_cap:.1}, size \
                 variation {variation:.2}",
                profile.mean_words_per_run()
            ),
        };
    }

    let mut unmet = Vec::new();
    if !few_runs {
        unmet.push(format!(
            "{runs} runs exceeds bulk maximum of {}",
            config.max_bulk_run_count
        ));
    }
    if !large {
        unmet.push(format!(
            "{words} words does not exceed bulk threshold {bulk_threshold:.1}"
        ));
    }
    if !interleaved {
        unmet.push(format!(
            "all {runs} run(s) form one block, so no interleaving with other identifiers"
        ));
    } else if !single_block {
        unmet.push(format!(
            "occurrences split across blocks (longest {span} of {runs})"
        ));
    }
    if !small {
        unmet.push(format!(
            "largest run {largest_run} words exceeds per-run cap {run_cap:.1}"
        ));
    }
    if !uniform {
        unmet.push(format!(
            "run size variation {variation:.2} exceeds {:.2}",
            config.max_run_word_variation
        ));
    }

    ClassificationVerdict {
        identifier: profile.identifier.clone(),
        label: VerdictLabel::Inconclusive,
        rationale: unmet.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::aggregate_profiles;
    use crate::types::TextRun;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn sequence(items: &[(&str, usize)]) -> Vec<TextRun> {
        items
            .iter()
            .enumerate()
            .map(|(i, (tag, n))| TextRun::new(words(*n), Some((*tag).to_string()), i))
            .collect()
    }

    fn key(tag: &str) -> RsidKey {
        RsidKey::Tagged(tag.to_string())
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&mut [5, 1, 3]), 3.0);
        assert_eq!(median(&mut [4, 1, 3, 2]), 2.5);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn variation_of_uniform_sizes_is_zero() {
        assert_eq!(coefficient_of_variation(&[4, 4, 4]), 0.0);
        assert!(coefficient_of_variation(&[1, 9]) > 0.5);
    }

    #[test]
    fn single_large_block_is_bulk_insertion() {
        let mut items: Vec<(String, usize)> = (0..50).map(|i| (format!("{i:08X}"), 4)).collect();
        items.insert(25, ("PASTED00".to_string(), 200));
        let borrowed: Vec<(&str, usize)> = items.iter().map(|(t, n)| (t.as_str(), *n)).collect();
        let profiles = aggregate_profiles(&sequence(&borrowed));

        let outcome = classify_profiles(&profiles, &ClassifierConfig::default()).unwrap();
        let verdict = outcome.verdict(&key("PASTED00")).unwrap();
        assert_eq!(verdict.label, VerdictLabel::LikelyBulkInsertion);
        assert!(verdict.rationale.contains("200 words"));
        assert!(outcome.diagnostics.is_clean());
        let bulk = outcome
            .verdicts
            .iter()
            .filter(|v| v.label == VerdictLabel::LikelyBulkInsertion)
            .count();
        assert_eq!(bulk, 1);
    }

    #[test]
    fn interleaved_small_runs_are_typed() {
        let runs = sequence(&[
            ("A", 3),
            ("B", 4),
            ("A", 4),
            ("C", 3),
            ("A", 3),
            ("B", 4),
            ("C", 3),
        ]);
        let profiles = aggregate_profiles(&runs);
        let outcome = classify_profiles(&profiles, &ClassifierConfig::default()).unwrap();
        for tag in ["A", "B", "C"] {
            assert_eq!(
                outcome.verdict(&key(tag)).unwrap().label,
                VerdictLabel::LikelyTyped,
                "{tag} should read as typed"
            );
        }
        // A: 3 + 4 + 3 words over three runs.
        let rationale = &outcome.verdict(&key("A")).unwrap().rationale;
        assert!(rationale.contains("mean 3.3 words per run"), "{rationale}");
    }

    #[test]
    fn long_typed_session_is_not_bulk() {
        // One dominant identifier, but spread across the timeline in small pieces.
        let mut items = Vec::new();
        for i in 0..20 {
            items.push(("MAIN", 5));
            if i % 4 == 0 {
                items.push(("EDIT", 2));
            }
        }
        items.push(("X", 5));
        items.push(("Y", 5));
        let profiles = aggregate_profiles(&sequence(&items));
        let outcome = classify_profiles(&profiles, &ClassifierConfig::default()).unwrap();
        assert_ne!(
            outcome.verdict(&key("MAIN")).unwrap().label,
            VerdictLabel::LikelyBulkInsertion
        );
    }

    #[test]
    fn too_few_identifiers_degrades_to_inconclusive() {
        let profiles = aggregate_profiles(&sequence(&[("A", 2), ("B", 300)]));
        let outcome = classify_profiles(&profiles, &ClassifierConfig::default()).unwrap();
        assert!(
            outcome
                .verdicts
                .iter()
                .all(|v| v.label == VerdictLabel::Inconclusive)
        );
        assert!(outcome.diagnostics.has(&Advisory::InsufficientSampleForClassification {
            identifiers: 2,
            required: 3,
        }));
        assert!(outcome.verdicts[1].rationale.contains("minimum sample"));
    }

    #[test]
    fn absent_bucket_is_always_inconclusive() {
        let mut runs = sequence(&[("A", 2), ("B", 2), ("C", 2)]);
        runs.push(TextRun::new(words(500), None, 3));
        let profiles = aggregate_profiles(&runs);
        let outcome = classify_profiles(&profiles, &ClassifierConfig::default()).unwrap();
        let absent = outcome.verdict(&RsidKey::Absent).unwrap();
        assert_eq!(absent.label, VerdictLabel::Inconclusive);
        assert!(absent.rationale.contains("no session identifier"));
    }

    #[test]
    fn inconclusive_rationale_names_unmet_threshold() {
        let runs = sequence(&[("A", 4), ("B", 4), ("C", 4), ("D", 10)]);
        let profiles = aggregate_profiles(&runs);
        let outcome = classify_profiles(&profiles, &ClassifierConfig::default()).unwrap();
        let verdict = outcome.verdict(&key("D")).unwrap();
        assert_eq!(verdict.label, VerdictLabel::Inconclusive);
        assert!(verdict.rationale.contains("does not exceed bulk threshold 12.0"));
    }

    #[test]
    fn thresholds_are_configurable() {
        let runs = sequence(&[("A", 4), ("B", 4), ("C", 4), ("D", 10)]);
        let profiles = aggregate_profiles(&runs);
        let config = ClassifierConfig {
            median_multiple: 2.0,
            ..Default::default()
        };
        let outcome = classify_profiles(&profiles, &config).unwrap();
        assert_eq!(
            outcome.verdict(&key("D")).unwrap().label,
            VerdictLabel::LikelyBulkInsertion
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ClassifierConfig {
            min_identifiers: 0,
            ..Default::default()
        };
        assert!(classify_profiles(&[], &config).is_err());
    }

    #[test]
    fn empty_profiles_produce_no_verdicts_or_advisories() {
        let outcome = classify_profiles(&[], &ClassifierConfig::default()).unwrap();
        assert!(outcome.verdicts.is_empty());
        assert!(outcome.diagnostics.is_clean());
    }
}
