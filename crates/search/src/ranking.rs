//! Search options, the ranking pipeline, and result ordering.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collate::locale_compare;
use crate::record::{Record, SearchResult};
use crate::relevance::score_record;
use crate::tags::matches_tag_filter;

/// Scores closer than this are ordered by usage and recency instead.
pub const SCORE_TIE_WINDOW: f64 = 0.1;

/// Default cap on returned results.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortBy {
    /// Score, then usage, then last activity
    #[default]
    Relevance,
    /// Last edit, newest first
    Recent,
    /// Usage count, then last use
    Usage,
    /// Title in locale order
    Alphabetical,
}

impl SortBy {
    /// All modes, in documentation order.
    pub const ALL: [SortBy; 4] = [Self::Relevance, Self::Recent, Self::Usage, Self::Alphabetical];

    /// Parse a mode name; anything unrecognised means relevance.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "recent" => Self::Recent,
            "usage" => Self::Usage,
            "alphabetical" => Self::Alphabetical,
            _ => Self::Relevance,
        }
    }

    /// Mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Recent => "recent",
            Self::Usage => "usage",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl FromStr for SortBy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl From<String> for SortBy {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Tag pre-filter (OR, substring, case-insensitive)
    pub tags: Vec<String>,
    /// Maximum number of results
    pub max_results: usize,
    /// Whether content is scored
    pub include_content: bool,
    /// Result ordering
    pub sort_by: SortBy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            include_content: true,
            sort_by: SortBy::Relevance,
        }
    }
}

impl SearchOptions {
    /// Set the tag pre-filter.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the result cap.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Enable or disable content scoring.
    #[must_use]
    pub fn with_content(mut self, include_content: bool) -> Self {
        self.include_content = include_content;
        self
    }

    /// Set the result ordering.
    #[must_use]
    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Filter, score, sort and truncate a record set.
///
/// A blank query skips scoring: the tag-filtered records come back in sort
/// order without annotations.
pub fn rank(records: &[Record], query: &str, options: &SearchOptions) -> Vec<SearchResult> {
    rank_iter(records.iter(), query, options)
}

pub(crate) fn rank_iter<'a, I>(records: I, query: &str, options: &SearchOptions) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a Record>,
{
    let candidates = records
        .into_iter()
        .filter(|record| matches_tag_filter(record, &options.tags));

    let mut results: Vec<SearchResult> = if query.trim().is_empty() {
        candidates.cloned().map(SearchResult::unscored).collect()
    } else {
        candidates
            .filter_map(|record| score_record(query, record, options.include_content))
            .collect()
    };

    debug!(
        matched = results.len(),
        sort_by = %options.sort_by,
        max_results = options.max_results,
        "Ranked records"
    );

    sort_results(&mut results, options.sort_by);
    results.truncate(options.max_results);
    results
}

/// Order results in place.
pub fn sort_results(results: &mut [SearchResult], sort_by: SortBy) {
    match sort_by {
        SortBy::Recent => results.sort_by(|a, b| {
            b.record
                .updated_or_created()
                .cmp(&a.record.updated_or_created())
        }),
        SortBy::Usage => results.sort_by(|a, b| {
            b.record
                .usage_count
                .cmp(&a.record.usage_count)
                .then_with(|| b.record.last_used_or_epoch().cmp(&a.record.last_used_or_epoch()))
        }),
        SortBy::Alphabetical => {
            results.sort_by(|a, b| locale_compare(&a.record.title, &b.record.title));
        }
        // Without scores the comparator is a plain usage/recency order.
        SortBy::Relevance if results.iter().all(|r| r.search_score.is_none()) => {
            results.sort_by(compare_relevance);
        }
        SortBy::Relevance => insertion_sort_by(results, compare_relevance),
    }
}

/// Relevance comparator.
///
/// Not transitive: scores within [`SCORE_TIE_WINDOW`] fall through to usage
/// and recency, so scored results must not be handed to `slice::sort_by`.
pub fn compare_relevance(a: &SearchResult, b: &SearchResult) -> Ordering {
    if let (Some(score_a), Some(score_b)) = (a.search_score, b.search_score) {
        if (score_a - score_b).abs() > SCORE_TIE_WINDOW {
            return score_b.total_cmp(&score_a);
        }
    }

    b.record
        .usage_count
        .cmp(&a.record.usage_count)
        .then_with(|| b.record.last_activity().cmp(&a.record.last_activity()))
}

/// Stable insertion sort that tolerates a non-transitive comparator.
///
/// On return no adjacent pair compares `Greater`.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
