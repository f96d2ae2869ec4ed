//! In-memory result cache for repeated queries.
//!
//! Entries are keyed by a SHA-256 of the query, the options and the full
//! record set, so any edit to a record produces a new key instead of a stale
//! hit. The cache is bounded; the oldest entry is evicted first.
//!
//! # Example
//!
//! ```
//! use promptvault_search::cache::{CacheConfig, ResultCache};
//! use promptvault_search::{rank, SearchOptions};
//!
//! let cache = ResultCache::new(CacheConfig::default());
//! let options = SearchOptions::default();
//! let results = cache.get_or_insert_with(&[], "query", &options, || rank(&[], "query", &options));
//! assert!(results.is_empty());
//! assert_eq!(cache.stats().misses, 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ranking::SearchOptions;
use crate::record::{Record, SearchResult};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached result sets (0 disables caching)
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 64 }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Vec<SearchResult>>,
    order: VecDeque<String>,
}

/// Bounded cache of ranked result sets.
#[derive(Debug)]
pub struct ResultCache {
    config: CacheConfig,
    state: RwLock<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Create a new cache instance
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: RwLock::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached results for this search, computing them on a miss.
    pub fn get_or_insert_with<F>(
        &self,
        records: &[Record],
        query: &str,
        options: &SearchOptions,
        compute: F,
    ) -> Vec<SearchResult>
    where
        F: FnOnce() -> Vec<SearchResult>,
    {
        if self.config.max_entries == 0 {
            return compute();
        }

        let Some(key) = cache_key(records, query, options) else {
            return compute();
        };

        if let Some(results) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return results;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let results = compute();
        self.insert(key, results.clone());
        results
    }

    /// Clear all cached values
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.order.clear();
    }

    /// Number of cached result sets.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.config.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(key)
            .cloned()
    }

    fn insert(&self, key: String, results: Vec<SearchResult>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if state.entries.insert(key.clone(), results).is_none() {
            state.order.push_back(key);
        }

        while state.order.len() > self.config.max_entries {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
            }
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached result sets
    pub entries: usize,
    /// Configured capacity
    pub capacity: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to rank
    pub misses: u64,
}

fn cache_key(records: &[Record], query: &str, options: &SearchOptions) -> Option<String> {
    let payload = serde_json::to_vec(&(query, options, records)).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    Some(hex::encode(hasher.finalize()))
}
