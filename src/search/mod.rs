//! Fuzzy phrase search
//!
//! - tokenizer: single-space splitting and token normalization
//! - fuzzy: per-token fuzzy equality and window equality
//! - engine: sliding-window scan of one document, aggregation across all documents
//!
//! Matching is typo tolerant (one substitution or deletion per query token)
//! and unranked: results come back in scan order.

pub mod engine;
pub mod fuzzy;
pub mod schema;
pub mod tokenizer;

pub use engine::{scan_document, SearchEngine};
pub use fuzzy::{check_words, matches, matches_with_mutation};
pub use schema::{SearchError, SearchMatch, SearchOptions, SearchOutcome};
pub use tokenizer::{normalize, split_tokens};
