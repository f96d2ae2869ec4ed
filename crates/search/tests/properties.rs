//! Property tests for scoring and ranking invariants.

use std::cmp::Ordering;

use chrono::{Duration, TimeZone, Utc};
use promptvault_search::{
    compare_relevance, extract_tags, fuzzy_score, matches_tag_filter, rank, Record, SearchOptions,
    SortBy, RELEVANCE_THRESHOLD,
};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        "[a-z]{1,6}",
        "[a-zA-Z ]{0,24}",
        "[a-zA-Z ]{0,48}",
        prop::collection::vec("[a-z-]{1,8}", 0..4),
        0u32..20,
        prop::option::of(0i64..60),
        0i64..60,
    )
        .prop_map(|(id, title, content, tags, usage, last_used, created)| {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            Record::new(id, title, content, base + Duration::days(created))
                .with_tags(tags)
                .with_usage(usage, last_used.map(|days| base + Duration::days(days)))
        })
}

proptest! {
    #[test]
    fn fuzzy_score_is_bounded_and_deterministic(query in "\\PC{0,16}", text in "\\PC{0,64}") {
        let score = fuzzy_score(&query, &text);
        prop_assert!((0.0..=1.1 + 1e-9).contains(&score));
        prop_assert_eq!(score, fuzzy_score(&query, &text));
    }

    #[test]
    fn fuzzy_score_ignores_case(query in "[a-zA-Z]{1,8}", text in "[a-zA-Z ]{1,32}") {
        let lower = fuzzy_score(&query.to_lowercase(), &text.to_lowercase());
        prop_assert_eq!(fuzzy_score(&query, &text), lower);
    }

    #[test]
    fn extract_tags_is_sorted_and_unique(records in prop::collection::vec(record_strategy(), 0..12)) {
        let tags = extract_tags(&records);
        prop_assert!(tags.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(tags.iter().all(|tag| *tag == tag.to_lowercase()));
    }

    #[test]
    fn relevance_sort_leaves_no_inverted_neighbours(
        records in prop::collection::vec(record_strategy(), 0..16),
        query in "[a-z]{1,4}",
    ) {
        let results = rank(&records, &query, &SearchOptions::default().with_sort(SortBy::Relevance));
        for pair in results.windows(2) {
            prop_assert_ne!(compare_relevance(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn scored_results_clear_threshold(
        records in prop::collection::vec(record_strategy(), 0..16),
        query in "[a-z]{1,4}",
    ) {
        let results = rank(&records, &query, &SearchOptions::default());
        for result in &results {
            let score = result.search_score.unwrap_or_default();
            prop_assert!(score > RELEVANCE_THRESHOLD);
            prop_assert!(result.matched_in.is_some());
        }
    }

    #[test]
    fn empty_query_returns_tag_filtered_subset(
        records in prop::collection::vec(record_strategy(), 0..16),
        filter in prop::collection::vec("[a-z]{1,3}", 0..3),
    ) {
        let options = SearchOptions::default().with_tags(filter.clone()).with_max_results(usize::MAX);
        let results = rank(&records, "", &options);
        let expected = records.iter().filter(|r| matches_tag_filter(r, &filter)).count();

        prop_assert_eq!(results.len(), expected);
        prop_assert!(results.iter().all(|r| r.search_score.is_none()));
    }
}
