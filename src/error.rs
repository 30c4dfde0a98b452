//! Error types shared across the extraction, parsing, and reporting stages.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RsidError>;

/// Unrecoverable failures. Any of these aborts the analysis of the current document
/// before aggregation, so no partial statistics are ever surfaced.
#[derive(Debug, Error)]
pub enum RsidError {
    #[error("container not found or unreadable at {path}: {reason}")]
    ContainerNotFound { path: PathBuf, reason: Box<str> },

    #[error("part '{part}' not present in container")]
    PartNotFound { part: Box<str> },

    #[error("part '{part}' is not valid UTF-8")]
    PartEncoding { part: Box<str> },

    #[error("malformed document XML at byte {position}: {reason}")]
    MalformedDocumentXml { position: u64, reason: Box<str> },

    #[error("invalid classifier configuration: {reason}")]
    InvalidConfig { reason: Box<str> },

    #[error("report rendering failed: {reason}")]
    Render { reason: Box<str> },

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Parse,
    Config,
    Render,
    Io,
}

impl Stage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Parse => "parse",
            Self::Config => "config",
            Self::Render => "render",
            Self::Io => "io",
        }
    }
}

impl RsidError {
    /// Stage that produced this error, for analyst-facing messages.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::ContainerNotFound { .. }
            | Self::PartNotFound { .. }
            | Self::PartEncoding { .. }
            | Self::Zip(_) => Stage::Extract,
            Self::MalformedDocumentXml { .. } => Stage::Parse,
            Self::InvalidConfig { .. } => Stage::Config,
            Self::Render { .. } => Stage::Render,
            Self::Io(_) => Stage::Io,
        }
    }
}
