//! Self-contained HTML report.

use quick_xml::escape::escape;

use super::palette::Palette;
use crate::pipeline::Analysis;
use crate::types::{StatisticsTable, VerdictLabel};

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:2em;line-height:1.5}\
table{border-collapse:collapse;margin-bottom:2em}\
th,td{border:1px solid #999;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#eee}\
.swatch{display:inline-block;width:0.9em;height:0.9em;margin-right:0.4em;border:1px solid #666}\
.run{padding:3px;margin:2px;border-radius:3px}\
.bulk{font-weight:bold;color:#a00}\
.typed{color:#060}\
.advisory{color:#a60}";

fn verdict_class(label: VerdictLabel) -> &'static str {
    match label {
        VerdictLabel::LikelyBulkInsertion => "bulk",
        VerdictLabel::LikelyTyped => "typed",
        VerdictLabel::Inconclusive => "inconclusive",
    }
}

/// Image links embedded in the report; `None` omits that section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportImages<'a> {
    pub chart: Option<&'a str>,
    pub heatmap: Option<&'a str>,
}

/// Render the report for `analysis`.
#[must_use]
pub fn render_html(
    title: &str,
    analysis: &Analysis,
    palette: &Palette,
    images: ReportImages<'_>,
) -> String {
    let stats = analysis.statistics();
    let mut out = String::with_capacity(4096 + analysis.runs.len() * 96);

    out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    out.push_str(&format!("<title>RSID Report: {}</title>", escape(title)));
    out.push_str(&format!("<style>{STYLE}</style></head><body>\n"));
    out.push_str(&format!("<h1>RSID Report: {}</h1>\n", escape(title)));

    push_summary(&mut out, analysis, &stats);
    push_statistics_table(&mut out, &stats, palette, analysis);

    if let Some(href) = images.chart {
        out.push_str("<h2>Word Count per RSID</h2>\n");
        push_image(&mut out, href, "RSID word count bar chart");
    }
    if let Some(href) = images.heatmap {
        out.push_str("<h2>Heatmap</h2>\n");
        push_image(&mut out, href, "RSID word count heatmap");
    }

    out.push_str("<h2>Text by RSID</h2>\n<div>");
    for run in &analysis.runs {
        let key = run.key();
        out.push_str(&format!(
            "<span class=\"run\" style=\"background-color:{}\" title=\"RSID: {}\">{}</span> ",
            palette.color(&key).hex(),
            escape(key.label()),
            escape(&run.content)
        ));
    }
    out.push_str("</div>\n</body></html>\n");
    out
}

fn push_image(out: &mut String, href: &str, alt: &str) {
    out.push_str(&format!(
        "<img src=\"{}\" alt=\"{alt}\" width=\"600\">\n",
        escape(href)
    ));
}

fn push_summary(out: &mut String, analysis: &Analysis, stats: &StatisticsTable) {
    out.push_str("<ul>\n");
    out.push_str(&format!("<li>Paragraphs: {}</li>\n", analysis.paragraphs));
    out.push_str(&format!("<li>Text runs: {}</li>\n", stats.total_runs));
    out.push_str(&format!("<li>Words: {}</li>\n", stats.total_words));
    out.push_str(&format!("<li>Identifiers: {}</li>\n", stats.rows.len()));
    out.push_str("</ul>\n");
    for advisory in &stats.advisories {
        out.push_str(&format!(
            "<p class=\"advisory\">{}</p>\n",
            escape(&advisory.to_string())
        ));
    }
}

fn push_statistics_table(
    out: &mut String,
    stats: &StatisticsTable,
    palette: &Palette,
    analysis: &Analysis,
) {
    out.push_str("<h2>RSID Statistics</h2>\n<table>\n");
    out.push_str(
        "<tr><th>RSID</th><th>Word Count</th><th>Runs</th><th>Longest Block</th>\
         <th>Verdict</th><th>Rationale</th></tr>\n",
    );
    for (row, profile) in stats.rows.iter().zip(&analysis.profiles) {
        out.push_str(&format!(
            "<tr><td><span class=\"swatch\" style=\"background-color:{}\"></span>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            palette.color(&profile.identifier).hex(),
            escape(&row.identifier),
            row.word_count,
            row.run_count,
            row.max_contiguous_span,
            verdict_class(row.verdict),
            row.verdict.label(),
            escape(&row.rationale)
        ));
    }
    out.push_str("</table>\n");
}
