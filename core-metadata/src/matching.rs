//! # Catalog Match Selector
//!
//! Picks the secondary catalog result that best agrees with the title and
//! channel a video was published under. Agreement is plain case-insensitive
//! containment; there is no fuzzy or phonetic matching.

use crate::catalog::CatalogItem;
use crate::normalize::{normalize_artist, normalize_title};

/// Points for a result whose title contains the wanted title.
pub const TITLE_MATCH: i32 = 2;
/// Points for a result whose title does not.
pub const TITLE_MISMATCH: i32 = -2;
/// Points for a result whose artist contains the wanted artist.
pub const ARTIST_MATCH: i32 = 1;
/// Points for a result whose artist does not.
pub const ARTIST_MISMATCH: i32 = -1;
/// Lowest winning score that still counts as a confident match.
pub const MIN_CONFIDENT_SCORE: i32 = 1;

fn field_points(field: Option<&str>, wanted: &str, hit: i32, miss: i32) -> i32 {
    if wanted.is_empty() {
        return 0;
    }
    match field {
        Some(value) if value.to_lowercase().contains(wanted) => hit,
        _ => miss,
    }
}

/// Scores one result against lowercased, normalized targets.
pub fn score(item: &CatalogItem, wanted_title: &str, wanted_artist: &str) -> i32 {
    field_points(item.title(), wanted_title, TITLE_MATCH, TITLE_MISMATCH)
        + field_points(item.artist(), wanted_artist, ARTIST_MATCH, ARTIST_MISMATCH)
}

/// Selects the best result, or `None` when nothing is a confident match.
///
/// When neither `title` nor `artist` carries usable text after normalization
/// the first result is returned as is. Ties go to the earlier result.
pub fn select_best<'a>(
    results: &'a [CatalogItem],
    title: &str,
    artist: &str,
) -> Option<&'a CatalogItem> {
    let first = results.first()?;

    let wanted_title = normalize_title(title).to_lowercase();
    let wanted_artist = normalize_artist(artist).to_lowercase();

    if wanted_title.is_empty() && wanted_artist.is_empty() {
        return Some(first);
    }

    let mut best: Option<(&CatalogItem, i32)> = None;
    for item in results {
        let points = score(item, &wanted_title, &wanted_artist);
        if best.map_or(true, |(_, top)| points > top) {
            best = Some((item, points));
        }
    }

    best.filter(|(_, top)| *top >= MIN_CONFIDENT_SCORE)
        .map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_results() {
        assert_eq!(select_best(&[], "Song", "Artist"), None);
    }

    #[test]
    fn test_shortcut_without_targets() {
        let results = vec![CatalogItem::new("A", "B"), CatalogItem::new("C", "D")];

        assert_eq!(select_best(&results, "", ""), Some(&results[0]));
        assert_eq!(select_best(&results, "(Official Video)", "Topic"), Some(&results[0]));
    }

    #[test]
    fn test_picks_highest_score() {
        let results = vec![
            CatalogItem::new("Other Song", "Artist"),
            CatalogItem::new("Song Title (Remastered)", "Artist Name"),
        ];

        let best = select_best(&results, "Song Title", "Artist Name").unwrap();
        assert_eq!(best.title(), Some("Song Title (Remastered)"));
    }

    #[test]
    fn test_tie_goes_to_first() {
        let results = vec![
            CatalogItem::new("Song", "Artist One"),
            CatalogItem::new("Song", "Artist Two"),
        ];

        let best = select_best(&results, "Song", "Artist").unwrap();
        assert_eq!(best.artist(), Some("Artist One"));
    }

    #[test]
    fn test_below_threshold_is_rejected() {
        let results = vec![CatalogItem::new("Different", "Someone Else")];

        // title miss (-2) + artist miss (-1)
        assert_eq!(score(&results[0], "song", "artist"), -3);
        assert_eq!(select_best(&results, "Song", "Artist"), None);
    }

    #[test]
    fn test_title_only_target() {
        let results = vec![CatalogItem::new("Song", "Whoever")];

        assert_eq!(score(&results[0], "song", ""), 2);
        assert!(select_best(&results, "Song", "").is_some());
    }

    #[test]
    fn test_artist_only_match_is_confident() {
        let results = vec![CatalogItem::new("Unrelated", "Artist")];

        assert_eq!(score(&results[0], "", "artist"), 1);
        assert!(select_best(&results, "", "Artist").is_some());
    }

    #[test]
    fn test_artist_hit_does_not_rescue_title_miss() {
        let results = vec![CatalogItem::new("Unrelated", "Artist")];

        assert_eq!(score(&results[0], "song", "artist"), -1);
        assert_eq!(select_best(&results, "Song", "Artist"), None);
    }

    #[test]
    fn test_missing_fields_count_as_miss() {
        let item = CatalogItem::default();
        assert_eq!(score(&item, "song", "artist"), -3);
        assert_eq!(score(&item, "", ""), 0);
    }

    #[test]
    fn test_targets_are_normalized() {
        let results = vec![CatalogItem::new("Song Title", "Artist Name")];

        let best = select_best(&results, "Song Title (Official Video)", "Artist Name - Topic");
        assert_eq!(best, Some(&results[0]));
    }
}
