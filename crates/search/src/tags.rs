//! Tag scoring, filtering and autocomplete.

use std::collections::BTreeSet;

use crate::collate::locale_compare;
use crate::record::Record;

/// Score for a tag equal to the query.
pub const EXACT_TAG_SCORE: f64 = 1.0;
/// Score for a tag containing, or contained in, the query.
pub const CONTAINS_TAG_SCORE: f64 = 0.8;
/// Score for a tag starting with the query.
pub const PREFIX_TAG_SCORE: f64 = 0.6;

/// Default number of tag completions.
pub const DEFAULT_TAG_SUGGESTIONS: usize = 5;

/// Score a query against a tag list.
///
/// An exact (case-insensitive) tag wins outright. Otherwise the best partial
/// match is returned, or `0` when nothing matched.
pub fn tag_score(query: &str, tags: &[String]) -> f64 {
    if tags.is_empty() {
        return 0.0;
    }

    let query = query.to_lowercase();
    let mut best = 0.0_f64;

    for tag in tags {
        let tag = tag.to_lowercase();
        if tag == query {
            return EXACT_TAG_SCORE;
        }
        if tag.contains(&query) || query.contains(&tag) {
            best = best.max(CONTAINS_TAG_SCORE);
        } else if tag.starts_with(&query) {
            best = best.max(PREFIX_TAG_SCORE);
        }
    }

    best
}

/// Check a record against a tag filter.
///
/// Filters are OR-ed; each one matches any record tag that contains it
/// (case-insensitive). An empty filter matches everything.
pub fn matches_tag_filter(record: &Record, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }

    filters.iter().any(|filter| {
        let filter = filter.to_lowercase();
        record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&filter))
    })
}

/// Collect the distinct tags of a record set.
///
/// # Returns
/// Lowercased tags, sorted and de-duplicated.
pub fn extract_tags(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.tags.iter())
        .map(|tag| tag.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Complete a partially typed tag.
///
/// Tags containing `partial` are returned, those starting with it first,
/// the rest in locale order.
///
/// # Arguments
/// * `records` - Record set to draw tags from
/// * `partial` - Partial tag input (case-insensitive)
/// * `limit` - Maximum number of completions
pub fn suggest_tags(records: &[Record], partial: &str, limit: usize) -> Vec<String> {
    let partial = partial.to_lowercase();

    let mut tags: Vec<String> = extract_tags(records)
        .into_iter()
        .filter(|tag| tag.contains(&partial))
        .collect();

    tags.sort_by(|a, b| {
        b.starts_with(&partial)
            .cmp(&a.starts_with(&partial))
            .then_with(|| locale_compare(a, b))
    });
    tags.truncate(limit);
    tags
}
