//! Suggestions for an empty query: usage, recency and optional context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ranking::{rank_iter, SearchOptions, SortBy};
use crate::record::{Record, SearchResult, SuggestionResult};

/// Default number of suggestions.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// Cap on the usage component.
const USAGE_CAP: f64 = 0.4;
/// Uses that add up to the cap at one tenth each.
const USAGE_DIVISOR: f64 = 10.0;
/// Recency component for a snippet used just now.
const RECENCY_MAX: f64 = 0.3;
/// Days over which the recency component decays to zero.
const RECENCY_WINDOW_DAYS: f64 = 30.0;
/// Weight of the context search score.
const CONTEXT_WEIGHT: f64 = 0.3;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Options for [`suggest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionOptions {
    /// Maximum number of suggestions
    pub max_suggestions: usize,
    /// Text surrounding the cursor, used as a search query when non-blank
    pub context: String,
    /// Record ids never suggested
    pub exclude_ids: Vec<String>,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            context: String::new(),
            exclude_ids: Vec::new(),
        }
    }
}

impl SuggestionOptions {
    /// Set the suggestion cap.
    #[must_use]
    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Set the context text.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set excluded record ids.
    #[must_use]
    pub fn with_excluded<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Suggest records as of now.
pub fn suggest(records: &[Record], options: &SuggestionOptions) -> Vec<SuggestionResult> {
    suggest_at(records, options, Utc::now())
}

/// Suggest records as of `now`.
///
/// With a non-blank context only records relevant to it are considered, at
/// most twice the suggestion cap.
pub fn suggest_at(
    records: &[Record],
    options: &SuggestionOptions,
    now: DateTime<Utc>,
) -> Vec<SuggestionResult> {
    let remaining = records
        .iter()
        .filter(|record| !options.exclude_ids.contains(&record.id));

    let candidates: Vec<SearchResult> = if options.context.trim().is_empty() {
        remaining.cloned().map(SearchResult::unscored).collect()
    } else {
        let context_options = SearchOptions::default()
            .with_max_results(options.max_suggestions.saturating_mul(2))
            .with_sort(SortBy::Relevance);
        rank_iter(remaining, &options.context, &context_options)
    };

    let mut suggestions: Vec<SuggestionResult> = candidates
        .into_iter()
        .map(|candidate| SuggestionResult {
            suggestion_score: suggestion_score(&candidate.record, candidate.search_score, now),
            record: candidate.record,
            search_score: candidate.search_score,
            matched_in: candidate.matched_in,
        })
        .collect();

    suggestions.sort_by(|a, b| b.suggestion_score.total_cmp(&a.suggestion_score));
    suggestions.truncate(options.max_suggestions);

    debug!(count = suggestions.len(), "Built suggestions");
    suggestions
}

/// Blend usage, recency and context relevance into one score.
///
/// # Arguments
/// * `record` - Candidate record
/// * `context_score` - Search score against the context, if one ran
/// * `now` - Reference time for recency
pub fn suggestion_score(record: &Record, context_score: Option<f64>, now: DateTime<Utc>) -> f64 {
    let usage = (f64::from(record.usage_count) / USAGE_DIVISOR).min(USAGE_CAP);

    let recency = record.last_used.map_or(0.0, |last_used| {
        let days_since = (now - last_used).num_milliseconds() as f64 / MILLIS_PER_DAY;
        (RECENCY_MAX - (days_since / RECENCY_WINDOW_DAYS) * RECENCY_MAX).max(0.0)
    });

    let context = context_score.map_or(0.0, |score| score * CONTEXT_WEIGHT);

    usage + recency + context
}
