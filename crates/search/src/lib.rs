//! Ranking engine for PromptVault snippet libraries.
//!
//! This crate provides:
//! - Tiered fuzzy scoring (substring, subsequence, word overlap)
//! - Weighted title/content/tag relevance with a cut-off
//! - Four result orderings, including a usage-aware relevance sort
//! - Usage and recency based suggestions, optionally narrowed by context
//! - Tag extraction and autocomplete
//! - Slash-command detection
//! - A debounced, cached search controller (`controller` feature)
//!
//! Every operation is a pure function of the records passed in; the crate
//! holds no library state of its own.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use promptvault_search::{rank, Record, SearchOptions};
//!
//! let records = vec![
//!     Record::new("1", "Code Review", "Review this diff", Utc::now()).with_tags(["dev"]),
//!     Record::new("2", "Haiku", "Write a poem", Utc::now()),
//! ];
//!
//! let results = rank(&records, "review", &SearchOptions::default());
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].record.id, "1");
//! ```

pub mod cache;
mod collate;
mod error;
mod fuzzy;
mod ranking;
mod record;
mod relevance;
mod suggest;
mod tags;
mod trigger;

#[cfg(feature = "controller")]
mod controller;

#[cfg(feature = "wasm")]
mod wasm;

pub use cache::{CacheConfig, CacheStats, ResultCache};
pub use collate::locale_compare;
pub use error::{Result, SearchError};
pub use fuzzy::{fuzzy_match, fuzzy_score};
pub use ranking::{
    compare_relevance, rank, sort_results, SearchOptions, SortBy, DEFAULT_MAX_RESULTS,
    SCORE_TIE_WINDOW,
};
pub use record::{parse_records, MatchLocation, Record, SearchResult, SuggestionResult};
pub use relevance::{
    score_record, FieldScores, CONTENT_WEIGHT, RELEVANCE_THRESHOLD, TAG_WEIGHT,
};
pub use suggest::{
    suggest, suggest_at, suggestion_score, SuggestionOptions, DEFAULT_MAX_SUGGESTIONS,
};
pub use tags::{
    extract_tags, matches_tag_filter, suggest_tags, tag_score, CONTAINS_TAG_SCORE,
    DEFAULT_TAG_SUGGESTIONS, EXACT_TAG_SCORE, PREFIX_TAG_SCORE,
};
pub use trigger::{detect_slash_command, SlashCommand};

#[cfg(feature = "controller")]
pub use controller::{SearchController, DEBOUNCE_DELAY};
