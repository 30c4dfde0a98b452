//! Optional TOML configuration file.
//!
//! ```toml
//! part = "word/document.xml"
//!
//! [classifier]
//! median_multiple = 4.0
//! min_identifiers = 5
//!
//! [output]
//! report = "out/report.html"
//! csv = "out/stats.csv"
//! ```
//!
//! Command-line flags take precedence over values read here.

use std::path::{Path, PathBuf};

use rsid_lens::{ClassifierConfig, Result, RsidError};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub part: Option<String>,
    pub classifier: Option<ClassifierConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub report: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub heatmap: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Read and parse a config file. Unreadable or invalid files are configuration errors.
pub fn load(path: &Path) -> Result<FileConfig> {
    let text = fs_err::read_to_string(path).map_err(|err| RsidError::InvalidConfig {
        reason: err.to_string().into(),
    })?;
    toml::from_str(&text).map_err(|err| RsidError::InvalidConfig {
        reason: format!("{}: {err}", path.display()).into(),
    })
}
