//! # Text Normalizer
//!
//! Cleans noisy video titles and channel names into search terms.
//!
//! Both normalizers are driven by an ordered [`RuleSet`]: a table of
//! `(pattern, replacement)` rules applied in sequence, repeated until the text
//! stops changing, then trimmed. Normalizing twice gives the same result even
//! when one removal exposes another match (for example `"music live video"`
//! becomes `"music video"` after the first pass).
//!
//! ```
//! use core_metadata::normalize::{normalize_artist, normalize_title};
//!
//! assert_eq!(normalize_title("Song (Official Video) [4K]"), "Song");
//! assert_eq!(normalize_artist("Artist Name - Topic"), "Artist Name");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// A single rewrite rule.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("normalizer rule pattern must compile"),
            replacement,
        }
    }
}

/// Ordered rule table.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Applies every rule once, in order, and trims the result.
    fn apply_once(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            current = rule
                .pattern
                .replace_all(&current, rule.replacement)
                .into_owned();
        }
        current.trim().to_string()
    }

    /// Applies the table until the text stops changing.
    ///
    /// Every rule either shortens the text or maps whitespace onto a single
    /// space, so the loop terminates.
    pub fn apply(&self, text: &str) -> String {
        let mut current = self.apply_once(text);
        loop {
            let next = self.apply_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

const BRACKETED: &str = r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}";

const TITLE_NOISE: &str = concat!(
    r"(?i)\b(?:official|lyrics?|mv|pv|music\s+video|live|performance|studio|cover",
    r"|remaster|hd|4k|visualizer|audio|full|version)\b|\bver\.",
);

const WHITESPACE: &str = r"\s+";

static TITLE_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new("bracketed", BRACKETED, " "),
        Rule::new("noise_keyword", TITLE_NOISE, " "),
        Rule::new("whitespace", WHITESPACE, " "),
    ])
});

static ARTIST_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::new("topic_suffix", r"(?i)\s*[-–—]?\s*\btopic\s*$", ""),
        Rule::new("channel_token", r"(?i)\b(?:topic|vevo|official|channel)\b", " "),
        Rule::new("trailing_separator", r"[\s\-–—|｜]+$", ""),
        Rule::new("whitespace", WHITESPACE, " "),
    ])
});

/// Rules used by [`normalize_title`].
pub fn title_rules() -> &'static RuleSet {
    &TITLE_RULES
}

/// Rules used by [`normalize_artist`].
pub fn artist_rules() -> &'static RuleSet {
    &ARTIST_RULES
}

/// Removes bracketed spans and video-packaging keywords from a title.
///
/// An empty result means "no usable text".
pub fn normalize_title(text: &str) -> String {
    TITLE_RULES.apply(text)
}

/// Removes channel decorations ("- Topic", "VEVO", "Official") from a
/// channel name.
pub fn normalize_artist(text: &str) -> String {
    ARTIST_RULES.apply(text)
}
