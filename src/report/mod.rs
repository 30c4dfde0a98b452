//! Report rendering. Everything here is a pure function of an [`Analysis`]; statistics are
//! never recomputed at this layer.
//!
//! Files are written through [`AtomicWriteFile`]. Every artifact is rendered and staged
//! before the first one is committed, so a failure leaves no new output behind.

#[cfg(feature = "chart")]
mod canvas;
#[cfg(feature = "chart")]
mod chart;
mod export;
#[cfg(feature = "chart")]
mod heatmap;
mod html;
mod palette;

use std::io::Write;
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;

#[cfg(feature = "chart")]
pub use chart::render_bar_chart;
pub use export::{statistics_csv, statistics_json};
#[cfg(feature = "chart")]
pub use heatmap::render_heatmap;
pub use html::{ReportImages, render_html};
pub use palette::{Color, Palette};

use crate::error::{Result, RsidError};
use crate::pipeline::Analysis;

/// Output destinations for one document. `None` skips that artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutputs {
    pub html: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub heatmap: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl ReportOutputs {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_none()
            && self.chart.is_none()
            && self.heatmap.is_none()
            && self.csv.is_none()
            && self.json.is_none()
    }
}

/// Paths actually written, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenReports {
    pub paths: Vec<PathBuf>,
}

fn write_failed(path: &Path, err: &std::io::Error) -> RsidError {
    RsidError::Render {
        reason: format!("failed to write {}: {err}", path.display()).into(),
    }
}

/// Write `bytes` to a temporary file beside `path`; nothing is visible until `commit`.
fn stage(path: &Path, bytes: &[u8]) -> Result<AtomicWriteFile> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|err| write_failed(path, &err))?;
    file.write_all(bytes).map_err(|err| write_failed(path, &err))?;
    Ok(file)
}

/// How the HTML report should reference an image written to `image`.
fn image_href(html: &Path, image: &Path) -> String {
    match (html.parent(), image.parent(), image.file_name()) {
        (Some(a), Some(b), Some(name)) if a == b => name.to_string_lossy().into_owned(),
        _ => image.display().to_string(),
    }
}

#[cfg(feature = "chart")]
fn chart_bytes(analysis: &Analysis, palette: &Palette) -> Result<Vec<u8>> {
    render_bar_chart(analysis, palette)
}

#[cfg(feature = "chart")]
fn heatmap_bytes(analysis: &Analysis) -> Result<Vec<u8>> {
    render_heatmap(analysis)
}

#[cfg(not(feature = "chart"))]
fn chart_bytes(_analysis: &Analysis, _palette: &Palette) -> Result<Vec<u8>> {
    Err(RsidError::Render {
        reason: "chart output requires the `chart` feature".into(),
    })
}

#[cfg(not(feature = "chart"))]
fn heatmap_bytes(_analysis: &Analysis) -> Result<Vec<u8>> {
    Err(RsidError::Render {
        reason: "heatmap output requires the `chart` feature".into(),
    })
}

/// Render and write every requested artifact for `analysis`.
///
/// All artifacts are rendered in memory and staged to temporary files before the first one
/// is committed. A rendering or staging failure therefore writes nothing. If a commit fails
/// part way, the artifacts committed earlier in the same call are removed again; files they
/// replaced are not restored.
pub fn write_reports(
    title: &str,
    analysis: &Analysis,
    outputs: &ReportOutputs,
) -> Result<WrittenReports> {
    let palette = Palette::for_profiles(&analysis.profiles);
    let stats = analysis.statistics();

    let mut pending: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    if let Some(path) = &outputs.chart {
        pending.push((path.clone(), chart_bytes(analysis, &palette)?));
    }
    if let Some(path) = &outputs.heatmap {
        pending.push((path.clone(), heatmap_bytes(analysis)?));
    }
    if let Some(path) = &outputs.html {
        let chart = outputs.chart.as_deref().map(|image| image_href(path, image));
        let heatmap = outputs.heatmap.as_deref().map(|image| image_href(path, image));
        let images = ReportImages {
            chart: chart.as_deref(),
            heatmap: heatmap.as_deref(),
        };
        let html = render_html(title, analysis, &palette, images);
        pending.push((path.clone(), html.into_bytes()));
    }
    if let Some(path) = &outputs.csv {
        pending.push((path.clone(), statistics_csv(&stats).into_bytes()));
    }
    if let Some(path) = &outputs.json {
        pending.push((path.clone(), statistics_json(&stats)?.into_bytes()));
    }

    let staged = pending
        .iter()
        .map(|(path, bytes)| stage(path, bytes).map(|file| (path, file)))
        .collect::<Result<Vec<_>>>()?;

    let mut written = WrittenReports::default();
    for (path, file) in staged {
        if let Err(err) = file.commit() {
            for done in &written.paths {
                if let Err(cleanup) = fs_err::remove_file(done) {
                    tracing::warn!(
                        target = "rsid_lens::report",
                        error = %cleanup,
                        "failed to remove partial artifact"
                    );
                }
            }
            return Err(write_failed(path, &err));
        }
        tracing::debug!(
            target = "rsid_lens::report",
            path = %path.display(),
            "artifact written"
        );
        written.paths.push(path.clone());
    }

    tracing::info!(
        target = "rsid_lens::report",
        artifacts = written.paths.len(),
        "report written"
    );
    Ok(written)
}
