//! Identifier → color mapping, built fresh for every report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{RsidKey, RsidProfile};

/// Fill used for the absent (`NO_RSID`) bucket.
const ABSENT_COLOR: Color = Color {
    r: 0xd9,
    g: 0xd9,
    b: 0xd9,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// CSS hex notation, e.g. `#a3c4f0`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Pastel color derived from the identifier's digest. Channels stay in 128..=255 so
    /// dark text remains legible on top.
    fn for_key(key: &RsidKey) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"rsid-lens:palette:");
        hasher.update(key.label().as_bytes());
        let digest = hasher.finalize();
        let bytes = digest.as_bytes();
        Self {
            r: 128 | (bytes[0] >> 1),
            g: 128 | (bytes[1] >> 1),
            b: 128 | (bytes[2] >> 1),
        }
    }
}

/// Explicit color assignment for one report. Colors depend only on the identifier, so the
/// same document always renders the same way.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<RsidKey, Color>,
}

impl Palette {
    #[must_use]
    pub fn for_profiles(profiles: &[RsidProfile]) -> Self {
        let colors = profiles
            .iter()
            .map(|profile| {
                let color = match &profile.identifier {
                    RsidKey::Absent => ABSENT_COLOR,
                    key => Color::for_key(key),
                };
                (profile.identifier.clone(), color)
            })
            .collect();
        Self { colors }
    }

    /// Color for `key`; identifiers outside the palette fall back to the absent fill.
    #[must_use]
    pub fn color(&self, key: &RsidKey) -> Color {
        self.colors.get(key).copied().unwrap_or(ABSENT_COLOR)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate_profiles;
    use crate::types::TextRun;

    #[test]
    fn colors_are_stable_across_palettes() {
        let runs = vec![
            TextRun::new("a", Some("00112233".into()), 0),
            TextRun::new("b", None, 1),
        ];
        let profiles = aggregate_profiles(&runs);
        let first = Palette::for_profiles(&profiles);
        let second = Palette::for_profiles(&profiles);
        let key = RsidKey::Tagged("00112233".into());
        assert_eq!(first.color(&key), second.color(&key));
        assert_eq!(first.color(&RsidKey::Absent), ABSENT_COLOR);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn colors_are_pastel() {
        let color = Color::for_key(&RsidKey::Tagged("00ABCDEF".into()));
        assert!(color.r >= 128 && color.g >= 128 && color.b >= 128);
        assert_eq!(color.hex().len(), 7);
    }
}
