//! Search value types

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::storage::StorageError;

/// One phrase match inside one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub document_id: String,
    pub document_name: String,
    /// Index of the window's first token in the document
    pub position: usize,
    /// Literal window tokens, each followed by a space
    pub snippet: String,
}

/// Result of a search call as seen by the transport layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matches: Vec<SearchMatch>,
    pub failed: bool,
}

impl SearchOutcome {
    pub fn found(matches: Vec<SearchMatch>) -> Self {
        Self { matches, failed: false }
    }

    pub fn failure() -> Self {
        Self {
            matches: Vec::new(),
            failed: true,
        }
    }
}

impl From<Result<Vec<SearchMatch>, SearchError>> for SearchOutcome {
    fn from(result: Result<Vec<SearchMatch>, SearchError>) -> Self {
        match result {
            Ok(matches) => Self::found(matches),
            Err(_) => Self::failure(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("search cancelled")]
    Cancelled,
    #[error("scan worker failed: {0}")]
    Worker(String),
}

/// Engine tuning; none of these change which matches are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Document scans in flight during an all-documents search
    pub scan_concurrency: usize,
    /// Scan positions between cancellation checks
    pub cancel_check_interval: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            scan_concurrency: 4,
            cancel_check_interval: 1024,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            scan_concurrency: config.scan_concurrency.max(1),
            cancel_check_interval: config.cancel_check_interval.max(1),
        }
    }
}
