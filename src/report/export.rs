//! Machine-readable statistics exports.

use crate::error::{Result, RsidError};
use crate::types::StatisticsTable;

const CSV_HEADER: &str = "rsid,tagged,word_count,run_count,max_contiguous_span,verdict,rationale";

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Statistics as CSV, one row per identifier, header included.
#[must_use]
pub fn statistics_csv(stats: &StatisticsTable) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in &stats.rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(&row.identifier),
            row.tagged,
            row.word_count,
            row.run_count,
            row.max_contiguous_span,
            row.verdict.code(),
            csv_field(&row.rationale)
        ));
    }
    out
}

/// Statistics as pretty-printed JSON.
pub fn statistics_json(stats: &StatisticsTable) -> Result<String> {
    serde_json::to_string_pretty(stats).map_err(|err| RsidError::Render {
        reason: format!("failed to serialize statistics: {err}").into(),
    })
}
