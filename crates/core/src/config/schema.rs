//! Configuration schema definitions
//!
//! Every field has a default, so an empty or partial file is valid.

use std::path::PathBuf;
use std::time::Duration;

use promptvault_search::{
    CacheConfig, SearchOptions, SortBy, SuggestionOptions, DEFAULT_MAX_RESULTS,
    DEFAULT_MAX_SUGGESTIONS, DEFAULT_TAG_SUGGESTIONS,
};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, Validator};

/// Log levels accepted in `[logging] level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Suggestion defaults
    #[serde(default)]
    pub suggestions: SuggestionsConfig,

    /// Tag autocomplete defaults
    #[serde(default)]
    pub tags: TagsConfig,

    /// Library location
    #[serde(default)]
    pub library: LibraryConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges.
    pub fn validate(&self) -> ValidationResult {
        Validator::new()
            .range("search.max_results", self.search.max_results, 1, 10_000)
            .range("search.debounce_ms", self.search.debounce_ms, 0, 5_000)
            .range("suggestions.max_suggestions", self.suggestions.max_suggestions, 1, 100)
            .range("tags.suggestion_limit", self.tags.suggestion_limit, 1, 100)
            .one_of("logging.level", &self.logging.level, &LOG_LEVELS)
            .validate()
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum results per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Score snippet content as well as titles and tags
    #[serde(default = "default_true")]
    pub include_content: bool,

    /// Default ordering
    #[serde(default)]
    pub sort_by: SortBy,

    /// Debounce delay for interactive search
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Cached result sets (0 disables the cache)
    #[serde(default = "default_cache_entries")]
    pub cache_entries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            include_content: true,
            sort_by: SortBy::default(),
            debounce_ms: default_debounce_ms(),
            cache_entries: default_cache_entries(),
        }
    }
}

impl SearchConfig {
    /// Search options with these defaults.
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions::default()
            .with_max_results(self.max_results)
            .with_content(self.include_content)
            .with_sort(self.sort_by)
    }

    /// Debounce delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Result cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_entries,
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_cache_entries() -> usize {
    CacheConfig::default().max_entries
}

fn default_true() -> bool {
    true
}

/// Suggestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    /// Maximum suggestions shown
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl SuggestionsConfig {
    /// Suggestion options with these defaults.
    pub fn to_options(&self) -> SuggestionOptions {
        SuggestionOptions::default().with_max_suggestions(self.max_suggestions)
    }
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

/// Tag autocomplete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Maximum tag completions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

fn default_suggestion_limit() -> usize {
    DEFAULT_TAG_SUGGESTIONS
}

/// Library configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    /// Exported library file used when `--library` is not given
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write logs to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.search.max_results, 50);
        assert!(schema.search.include_content);
        assert_eq!(schema.search.sort_by, SortBy::Relevance);
        assert_eq!(schema.search.debounce(), Duration::from_millis(150));
        assert_eq!(schema.suggestions.max_suggestions, 8);
        assert_eq!(schema.tags.suggestion_limit, 5);
        assert!(schema.library.path.is_none());
        assert!(schema.validate().is_valid());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [search]
            sort_by = "usage"
            max_results = 10
            "#,
        )
        .unwrap();

        assert_eq!(schema.search.sort_by, SortBy::Usage);
        assert_eq!(schema.search.max_results, 10);
        assert_eq!(schema.search.debounce_ms, 150);
        assert_eq!(schema.suggestions.max_suggestions, 8);
    }

    #[test]
    fn test_to_options() {
        let config = SearchConfig {
            max_results: 3,
            include_content: false,
            sort_by: SortBy::Alphabetical,
            ..SearchConfig::default()
        };
        let options = config.to_options();

        assert_eq!(options.max_results, 3);
        assert!(!options.include_content);
        assert_eq!(options.sort_by, SortBy::Alphabetical);
        assert!(options.tags.is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut schema = ConfigSchema::default();
        schema.search.max_results = 0;
        schema.logging.level = "chatty".to_string();

        let result = schema.validate();
        assert_eq!(result.errors().len(), 2);
    }
}
