//! Reduce a run sequence into per-identifier profiles.

use std::collections::HashMap;

use crate::types::{RsidKey, RsidProfile, TextRun};

/// Total whitespace-delimited words across all runs.
#[must_use]
pub fn total_words(runs: &[TextRun]) -> usize {
    runs.iter().map(TextRun::word_count).sum()
}

/// Build one profile per distinct identifier, in order of first occurrence.
///
/// Runs without any identifier are grouped under [`RsidKey::Absent`], which never merges with
/// a tagged identifier, including one literally named `NO_RSID`.
#[must_use]
pub fn aggregate_profiles(runs: &[TextRun]) -> Vec<RsidProfile> {
    let mut profiles: Vec<RsidProfile> = Vec::new();
    let mut slots: HashMap<RsidKey, usize> = HashMap::new();

    let mut streak_slot: Option<usize> = None;
    let mut streak_len = 0usize;

    for run in runs {
        let key = run.key();
        let words = run.word_count();
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            profiles.push(RsidProfile {
                identifier: key,
                total_word_count: 0,
                run_count: 0,
                occurrence_positions: Vec::new(),
                run_word_counts: Vec::new(),
                max_contiguous_span: 0,
            });
            profiles.len() - 1
        });

        if streak_slot == Some(slot) {
            streak_len += 1;
        } else {
            streak_slot = Some(slot);
            streak_len = 1;
        }

        let profile = &mut profiles[slot];
        profile.total_word_count += words;
        profile.run_count += 1;
        profile.occurrence_positions.push(run.sequence_index);
        profile.run_word_counts.push(words);
        profile.max_contiguous_span = profile.max_contiguous_span.max(streak_len);
    }

    tracing::debug!(
        target = "rsid_lens::aggregate",
        runs = runs.len(),
        identifiers = profiles.len(),
        "profiles aggregated"
    );
    profiles
}
