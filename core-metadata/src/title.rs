//! Title splitting: `"Artist - Track"` style titles into two halves.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Non-greedy left side, first delimiter run wins. Halves may span lines.
static DELIMITED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(.+?)\s*[-–—|｜/:]+\s*(.+)$").expect("title delimiter regex")
});

/// The two halves of a delimited title.
///
/// Either both halves are non-empty or both are empty; construct through
/// [`TitleParts::new`] or [`split_title`] to keep that guarantee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTitleParts")]
pub struct TitleParts {
    left: String,
    right: String,
}

/// Wire form of [`TitleParts`]; deserialized values go through
/// [`TitleParts::new`].
#[derive(Deserialize)]
struct RawTitleParts {
    #[serde(default)]
    left: String,
    #[serde(default)]
    right: String,
}

impl From<RawTitleParts> for TitleParts {
    fn from(raw: RawTitleParts) -> Self {
        TitleParts::new(raw.left, raw.right)
    }
}

impl TitleParts {
    /// Builds parts from two halves, trimming both. Returns empty parts
    /// unless both halves carry text.
    pub fn new(left: impl AsRef<str>, right: impl AsRef<str>) -> Self {
        let left = left.as_ref().trim();
        let right = right.as_ref().trim();

        if left.is_empty() || right.is_empty() {
            return Self::default();
        }

        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() || self.right.is_empty()
    }
}

/// Splits a normalized title on the first delimiter group (`-`, `–`, `—`,
/// `|`, `｜`, `/`, `:`).
///
/// ```
/// use core_metadata::title::split_title;
///
/// let parts = split_title("Artist - Track Name");
/// assert_eq!(parts.left(), "Artist");
/// assert_eq!(parts.right(), "Track Name");
/// assert!(split_title("NoDelimiterHere").is_empty());
/// ```
pub fn split_title(normalized_title: &str) -> TitleParts {
    DELIMITED
        .captures(normalized_title.trim())
        .map(|caps| TitleParts::new(&caps[1], &caps[2]))
        .unwrap_or_default()
}
