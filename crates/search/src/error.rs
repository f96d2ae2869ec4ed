//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// Scoring itself never fails; these only surface at the debounce and
/// JSON boundaries.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A newer query cancelled this one before its debounce delay elapsed
    #[error("search #{generation} was superseded by a newer query")]
    Superseded {
        /// Sequence number of the cancelled call
        generation: u64,
    },

    /// Record or option payload could not be parsed
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    /// Returns true if the error is a debounce cancellation.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}
