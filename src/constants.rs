//! Fixed names from the WordprocessingML schema and crate-wide defaults.

/// WordprocessingML main namespace. Elements and attributes are matched against this URI,
/// never against a prefix.
pub const WORDPROCESSINGML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Markup-compatibility namespace (`mc:AlternateContent`, `mc:Choice`, `mc:Fallback`).
pub const MARKUP_COMPATIBILITY_NS: &[u8] =
    b"http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Main document body part inside a `.docx` container.
pub const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

/// Display label for runs that carry no session identifier at any level.
pub const NO_RSID_LABEL: &str = "NO_RSID";

/// Default output file names used by the command-line tool.
pub const DEFAULT_REPORT_FILE: &str = "rsid_report.html";
pub const DEFAULT_CHART_FILE: &str = "rsid_bar_chart.png";
pub const DEFAULT_HEATMAP_FILE: &str = "rsid_heatmap.png";
