//! Text runs and the identifier key they aggregate under.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::NO_RSID_LABEL;

/// A contiguous span of visible text sharing one effective RSID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// Concatenated `w:t` text of the run, untrimmed.
    pub content: String,
    /// Effective session identifier after run → paragraph fallback.
    pub rsid: Option<String>,
    /// 0-based position among retained runs, in reading order.
    pub sequence_index: usize,
}

impl TextRun {
    #[must_use]
    pub fn new(content: impl Into<String>, rsid: Option<String>, sequence_index: usize) -> Self {
        Self {
            content: content.into(),
            rsid,
            sequence_index,
        }
    }

    /// Whitespace-delimited token count of the run's content.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    #[must_use]
    pub fn key(&self) -> RsidKey {
        RsidKey::from(self.rsid.as_deref())
    }
}

/// Aggregation key for a run's identifier.
///
/// `Absent` renders as `NO_RSID` but is a distinct variant, so a document that literally
/// stamps `NO_RSID` as a tag lands in `Tagged("NO_RSID")`, not in the absent bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RsidKey {
    Tagged(String),
    Absent,
}

impl RsidKey {
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        matches!(self, Self::Tagged(_))
    }

    /// Human-readable label; `NO_RSID` for the absent bucket.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Tagged(value) => value,
            Self::Absent => NO_RSID_LABEL,
        }
    }
}

impl From<Option<&str>> for RsidKey {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(tag) => Self::Tagged(tag.to_string()),
            None => Self::Absent,
        }
    }
}

impl fmt::Display for RsidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_no_rsid_tag_is_not_the_absent_bucket() {
        let literal = RsidKey::from(Some("NO_RSID"));
        assert_eq!(literal.label(), RsidKey::Absent.label());
        assert_ne!(literal, RsidKey::Absent);
        assert!(literal.is_tagged());
    }

    #[test]
    fn word_count_splits_on_unicode_whitespace() {
        let run = TextRun::new("  one\ttwo\u{00a0}three\u{2003}four ", None, 0);
        assert_eq!(run.word_count(), 4);
    }

    #[test]
    fn key_serializes_with_kind_tag() {
        let tagged = serde_json::to_string(&RsidKey::Tagged("00A1B2C3".into())).unwrap();
        assert_eq!(tagged, r#"{"kind":"tagged","value":"00A1B2C3"}"#);
        let absent = serde_json::to_string(&RsidKey::Absent).unwrap();
        assert_eq!(absent, r#"{"kind":"absent"}"#);
    }
}
