//! Relevance scoring for search results.

use crate::fuzzy::fuzzy_score;
use crate::record::{MatchLocation, Record, SearchResult};
use crate::tags::tag_score;

/// Scores at or below this are dropped from a searched result set.
pub const RELEVANCE_THRESHOLD: f64 = 0.3;
/// Weight applied to the content score.
pub const CONTENT_WEIGHT: f64 = 0.7;
/// Weight applied to the tag score.
pub const TAG_WEIGHT: f64 = 0.8;

/// Weighted per-field scores of one record against one query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldScores {
    /// Title score (unweighted)
    pub title: f64,
    /// Content score times [`CONTENT_WEIGHT`]; zero when content is skipped
    pub content: f64,
    /// Tag score times [`TAG_WEIGHT`]
    pub tags: f64,
}

impl FieldScores {
    /// Score every field of a record.
    pub fn compute(query: &str, record: &Record, include_content: bool) -> Self {
        let content = if include_content {
            fuzzy_score(query, &record.content) * CONTENT_WEIGHT
        } else {
            0.0
        };

        Self {
            title: fuzzy_score(query, &record.title),
            content,
            tags: tag_score(query, &record.tags) * TAG_WEIGHT,
        }
    }

    /// Best weighted field score.
    pub fn composite(&self) -> f64 {
        self.title.max(self.content).max(self.tags)
    }

    /// Field that produced the composite. Ties go to title, then tags.
    pub fn matched_in(&self) -> MatchLocation {
        if self.title >= self.content && self.title >= self.tags {
            MatchLocation::Title
        } else if self.tags >= self.content {
            MatchLocation::Tags
        } else {
            MatchLocation::Content
        }
    }

    /// Whether the record clears [`RELEVANCE_THRESHOLD`].
    pub fn is_relevant(&self) -> bool {
        self.composite() > RELEVANCE_THRESHOLD
    }
}

/// Score a record against a query.
///
/// # Returns
/// An annotated copy of the record, or `None` if it is not relevant.
pub fn score_record(query: &str, record: &Record, include_content: bool) -> Option<SearchResult> {
    let scores = FieldScores::compute(query, record, include_content);
    scores
        .is_relevant()
        .then(|| SearchResult::scored(record.clone(), scores.composite(), scores.matched_in()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(title: &str, content: &str, tags: &[&str]) -> Record {
        Record::new("1", title, content, Utc::now()).with_tags(tags.iter().copied())
    }

    #[test]
    fn test_composite_takes_weighted_maximum() {
        let scores = FieldScores { title: 0.2, content: 0.5, tags: 0.64 };
        assert_eq!(scores.composite(), 0.64);
        assert_eq!(scores.matched_in(), MatchLocation::Tags);
    }

    #[test]
    fn test_matched_in_tie_breaks() {
        let all_equal = FieldScores { title: 0.5, content: 0.5, tags: 0.5 };
        assert_eq!(all_equal.matched_in(), MatchLocation::Title);

        let tags_tie_content = FieldScores { title: 0.1, content: 0.5, tags: 0.5 };
        assert_eq!(tags_tie_content.matched_in(), MatchLocation::Tags);

        let content = FieldScores { title: 0.1, content: 0.6, tags: 0.5 };
        assert_eq!(content.matched_in(), MatchLocation::Content);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let at_threshold = FieldScores { title: RELEVANCE_THRESHOLD, content: 0.0, tags: 0.0 };
        assert!(!at_threshold.is_relevant());
    }

    #[test]
    fn test_content_can_be_skipped() {
        let rec = record("Unrelated", "all about lighthouses", &[]);

        let with_content = FieldScores::compute("lighthouses", &rec, true);
        let without = FieldScores::compute("lighthouses", &rec, false);

        assert!(with_content.content > 0.0);
        assert_eq!(without.content, 0.0);
        assert!(score_record("lighthouses", &rec, false).is_none());
    }

    #[test]
    fn test_score_record_annotates_copy() {
        let rec = record("Python Data Analysis", "Analyze data", &["python"]);
        let result = score_record("python", &rec, true).unwrap();

        assert_eq!(result.record, rec);
        assert_eq!(result.matched_in, Some(MatchLocation::Title));
        assert!(result.search_score.unwrap() > 0.9);
    }
}
