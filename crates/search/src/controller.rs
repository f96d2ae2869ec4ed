//! Debounced search entry point.
//!
//! Keystroke-driven callers fire a search per character. The controller
//! waits out a short delay before ranking and lets each new call cancel the
//! one still waiting, so only the newest query is ever ranked. A cancelled
//! call resolves at once with [`SearchError::Superseded`].
//!
//! # Example
//!
//! ```
//! use promptvault_search::{SearchController, SearchOptions};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! # runtime.block_on(async {
//! let controller = SearchController::new();
//! let results = controller.search(&[], "review", &SearchOptions::default()).await.unwrap();
//! assert!(results.is_empty());
//! # });
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::cache::{CacheConfig, CacheStats, ResultCache};
use crate::error::{Result, SearchError};
use crate::ranking::{rank, SearchOptions};
use crate::record::{Record, SearchResult};

/// Delay between a call and its ranking pass.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(150);

/// The call currently waiting out its delay.
struct Armed {
    generation: u64,
    token: CancellationToken,
}

/// Single-flight, debounced search over caller-supplied records.
pub struct SearchController {
    delay: Duration,
    generation: AtomicU64,
    armed: Mutex<Option<Armed>>,
    cache: ResultCache,
}

impl SearchController {
    /// Create a controller with the default 150 ms delay.
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE_DELAY)
    }

    /// Create a controller with a custom delay.
    pub fn with_debounce(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
            armed: Mutex::new(None),
            cache: ResultCache::default(),
        }
    }

    /// Replace the result cache configuration.
    #[must_use]
    pub fn with_cache(mut self, config: CacheConfig) -> Self {
        self.cache = ResultCache::new(config);
        self
    }

    /// Configured delay.
    pub fn debounce(&self) -> Duration {
        self.delay
    }

    /// Search after the debounce delay.
    ///
    /// # Errors
    /// [`SearchError::Superseded`] if another call arrives before the delay
    /// elapses. The newer call is unaffected.
    #[instrument(
        skip(self, records, options),
        fields(records = records.len(), generation = tracing::field::Empty)
    )]
    pub async fn search(
        &self,
        records: &[Record],
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("generation", generation);

        let token = self.arm(generation);

        tokio::select! {
            biased;

            () = token.cancelled() => {
                debug!(generation, "Search superseded");
                Err(SearchError::Superseded { generation })
            }
            () = tokio::time::sleep(self.delay) => {
                self.disarm(generation);
                Ok(self.search_now(records, query, options))
            }
        }
    }

    /// Search immediately, bypassing the debounce but not the cache.
    pub fn search_now(&self, records: &[Record], query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        self.cache
            .get_or_insert_with(records, query, options, || rank(records, query, options))
    }

    /// Drop every cached result set.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Install a fresh token for `generation`, cancelling the previous one.
    fn arm(&self, generation: u64) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Armed {
                generation,
                token: token.clone(),
            });

        if let Some(previous) = previous {
            debug!(superseded = previous.generation, by = generation, "Cancelling pending search");
            previous.token.cancel();
        }

        token
    }

    fn disarm(&self, generation: u64) {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        if armed.as_ref().is_some_and(|a| a.generation == generation) {
            *armed = None;
        }
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::time::Instant;

    fn records() -> Vec<Record> {
        vec![
            Record::new("1", "Code Review", "review this code", Utc::now()),
            Record::new("2", "Abstract Art", "paint abstract shapes", Utc::now()),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_for_debounce() {
        let controller = SearchController::new();
        let start = Instant::now();

        let results = controller.search(&records(), "review", &SearchOptions::default()).await.unwrap();

        assert!(start.elapsed() >= DEBOUNCE_DELAY);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, "1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_call_supersedes_pending_call() {
        let controller = SearchController::new();
        let records = records();
        let options = SearchOptions::default();

        let (first, second) = tokio::join!(controller.search(&records, "a", &options), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            controller.search(&records, "ab", &options).await
        });

        assert!(matches!(first, Err(SearchError::Superseded { generation: 1 })));
        assert_eq!(second.unwrap(), rank(&records, "ab", &options));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_call_resolves_without_waiting() {
        let controller = SearchController::new();
        let records = records();
        let options = SearchOptions::default();
        let start = Instant::now();

        let (first, _second) = tokio::join!(
            async {
                let result = controller.search(&records, "a", &options).await;
                (result, start.elapsed())
            },
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                controller.search(&records, "ab", &options).await
            }
        );

        assert!(first.0.unwrap_err().is_superseded());
        assert!(first.1 < DEBOUNCE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_calls_both_complete() {
        let controller = SearchController::new();
        let records = records();
        let options = SearchOptions::default();

        assert!(controller.search(&records, "code", &options).await.is_ok());
        assert!(controller.search(&records, "art", &options).await.is_ok());
    }

    #[test]
    fn test_search_now_uses_cache() {
        let controller = SearchController::new();
        let records = records();
        let options = SearchOptions::default();

        controller.search_now(&records, "code", &options);
        controller.search_now(&records, "code", &options);
        assert_eq!(controller.cache_stats().hits, 1);

        controller.clear_cache();
        assert_eq!(controller.cache_stats().entries, 0);
    }
}
