//! Search engine - phrase scanning over stored documents
//!
//! - `search_document`: slide a query-sized window over one document
//! - `search_all`: repeat that for every stored document, in storage order
//!
//! The engine holds no state between calls. Storage is reached only through
//! `DocumentStore::get_document` and `DocumentStore::list_documents`.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use super::fuzzy::window_matches;
use super::schema::{SearchError, SearchMatch, SearchOptions, SearchOutcome};
use super::tokenizer::{normalize_all, split_tokens};
use crate::models::Document;
use crate::storage::DocumentStore;

pub struct SearchEngine {
    store: Arc<dyn DocumentStore>,
    options: SearchOptions,
    cancel: CancellationToken,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_options(store, SearchOptions::default(), CancellationToken::new())
    }

    pub fn with_options(store: Arc<dyn DocumentStore>, options: SearchOptions, cancel: CancellationToken) -> Self {
        Self {
            store,
            options,
            cancel,
        }
    }

    /// Token that aborts in-flight searches when cancelled
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Search one document. Unknown ids give an empty, successful outcome.
    pub async fn search_document(&self, document_id: &str, query_text: &str, stop_after_one: bool) -> SearchOutcome {
        let result = self.try_search_document(document_id, query_text, stop_after_one).await;
        if let Err(ref e) = result {
            tracing::error!("Search in document {} failed: {}", document_id, e);
        }
        result.into()
    }

    /// Search every document and concatenate the matches in storage order.
    /// `stop_after_one` limits each document to one match, not the whole search.
    pub async fn search_all(&self, query_text: &str, stop_after_one: bool) -> SearchOutcome {
        let result = self.try_search_all(query_text, stop_after_one).await;
        if let Err(ref e) = result {
            tracing::error!("Search across all documents failed: {}", e);
        }
        result.into()
    }

    pub async fn try_search_document(
        &self,
        document_id: &str,
        query_text: &str,
        stop_after_one: bool,
    ) -> Result<Vec<SearchMatch>, SearchError> {
        self.checkpoint()?;

        let Some(document) = self.store.get_document(document_id).await? else {
            tracing::debug!("Document {} not found, nothing to search", document_id);
            return Ok(Vec::new());
        };

        let query = query_text.to_owned();
        let interval = self.options.cancel_check_interval;
        let cancel = self.cancel.clone();

        // Mutation matching is CPU bound; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            scan_until(&document, &query, stop_after_one, interval, || cancel.is_cancelled())
        })
        .await
        .map_err(|e| SearchError::Worker(e.to_string()))?
    }

    /// Any per-document failure fails the whole search; no partial results
    pub async fn try_search_all(&self, query_text: &str, stop_after_one: bool) -> Result<Vec<SearchMatch>, SearchError> {
        self.checkpoint()?;

        let documents = self.store.list_documents().await?;
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let document_count = documents.len();
        // `buffered` yields in input order, so matches stay in storage order
        let mut scans = stream::iter(documents)
            .map(move |document| async move {
                self.try_search_document(&document.id, query_text, stop_after_one).await
            })
            .buffered(self.options.scan_concurrency.max(1));

        let mut matches = Vec::new();
        while let Some(result) = scans.next().await {
            matches.extend(result?);
            self.checkpoint()?;
        }

        tracing::debug!("Scanned {} documents, {} matches", document_count, matches.len());
        Ok(matches)
    }

    fn checkpoint(&self) -> Result<(), SearchError> {
        if self.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }
}

/// Scan one document for a phrase, without cancellation
pub fn scan_document(document: &Document, query_text: &str, stop_after_one: bool) -> Vec<SearchMatch> {
    scan_until(document, query_text, stop_after_one, usize::MAX, || false).unwrap_or_default()
}

/// Slide the query window over the document's tokens.
///
/// Only full windows are tried; once `position + query_len` passes the end
/// the scan stops. `is_cancelled` is polled every `check_every` positions.
fn scan_until(
    document: &Document,
    query_text: &str,
    stop_after_one: bool,
    check_every: usize,
    is_cancelled: impl Fn() -> bool,
) -> Result<Vec<SearchMatch>, SearchError> {
    let doc_tokens = split_tokens(&document.text);
    let query_tokens = split_tokens(query_text);
    let window_len = query_tokens.len();

    let mut matches = Vec::new();
    if doc_tokens.len() < window_len {
        return Ok(matches);
    }

    let normalized_doc = normalize_all(&doc_tokens);
    let normalized_query = normalize_all(&query_tokens);
    let check_every = check_every.max(1);

    for (position, window) in normalized_doc.windows(window_len).enumerate() {
        if position > 0 && position % check_every == 0 && is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        if !window_matches(window, &normalized_query) {
            continue;
        }

        matches.push(SearchMatch {
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            position,
            snippet: snippet(&doc_tokens[position..position + window_len]),
        });

        if stop_after_one {
            break;
        }
    }

    Ok(matches)
}

/// Literal window text, every token followed by one space
fn snippet(tokens: &[&str]) -> String {
    tokens.iter().fold(String::new(), |mut acc, token| {
        acc.push_str(token);
        acc.push(' ');
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use async_trait::async_trait;

    const CAT_TEXT: &str = "the cat sat on the mat";

    fn engine_with(documents: Vec<Document>) -> SearchEngine {
        SearchEngine::new(Arc::new(MemoryStore::with_documents(documents)))
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn get_document(&self, _id: &str) -> Result<Option<Document>, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
        async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
        async fn add_document(&self, _document: Document) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
        async fn update_document(&self, _document: Document) -> Result<bool, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
        async fn remove_document(&self, _id: &str) -> Result<bool, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
        async fn remove_all(&self) -> Result<u64, StorageError> {
            Err(StorageError::Unavailable("down".to_string()))
        }
    }

    /// Lists fine, but fetching one particular document fails
    struct BrokenDocumentStore {
        inner: MemoryStore,
        broken_id: &'static str,
    }

    #[async_trait]
    impl DocumentStore for BrokenDocumentStore {
        async fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError> {
            if id == self.broken_id {
                return Err(StorageError::Unavailable(format!("cannot read {}", id)));
            }
            self.inner.get_document(id).await
        }
        async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
            self.inner.list_documents().await
        }
        async fn add_document(&self, document: Document) -> Result<(), StorageError> {
            self.inner.add_document(document).await
        }
        async fn update_document(&self, document: Document) -> Result<bool, StorageError> {
            self.inner.update_document(document).await
        }
        async fn remove_document(&self, id: &str) -> Result<bool, StorageError> {
            self.inner.remove_document(id).await
        }
        async fn remove_all(&self) -> Result<u64, StorageError> {
            self.inner.remove_all().await
        }
    }

    #[tokio::test]
    async fn test_typo_phrase_stop_after_one() {
        let engine = engine_with(vec![Document::new("b1", "Cats", CAT_TEXT)]);
        let outcome = engine.search_document("b1", "the cot sat", true).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].position, 0);
        assert_eq!(outcome.matches[0].snippet, "the cat sat ");
        assert_eq!(outcome.matches[0].document_id, "b1");
        assert_eq!(outcome.matches[0].document_name, "Cats");
    }

    #[tokio::test]
    async fn test_all_positions_in_order() {
        let engine = engine_with(vec![Document::new("b1", "Cats", CAT_TEXT)]);
        let outcome = engine.search_document("b1", "the mat", false).await;

        // "the cat" matches through a single substitution in "mat"
        let positions: Vec<usize> = outcome.matches.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 4]);
        assert_eq!(outcome.matches[1].snippet, "the mat ");
    }

    #[tokio::test]
    async fn test_no_alignment() {
        let engine = engine_with(vec![Document::new("b1", "Cats", CAT_TEXT)]);
        let outcome = engine.search_document("b1", "dog sat sat", false).await;
        assert!(!outcome.failed);
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_document_shorter_than_query() {
        let engine = engine_with(vec![Document::new("b1", "Short", "the cat")]);
        let outcome = engine.search_document("b1", "the cat sat", false).await;
        assert!(!outcome.failed);
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_window_not_tried() {
        // the only window starting at "sat" would run past the end
        let engine = engine_with(vec![Document::new("b1", "Tail", "on the mat sat")]);
        let outcome = engine.search_document("b1", "sat on", false).await;
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_is_not_an_error() {
        let engine = engine_with(vec![]);
        let outcome = engine.search_document("nope", "cat", false).await;
        assert_eq!(outcome, SearchOutcome::default());
    }

    #[tokio::test]
    async fn test_empty_query_matches_nothing() {
        let engine = engine_with(vec![Document::new("b1", "Cats", CAT_TEXT)]);
        let outcome = engine.search_document("b1", "", false).await;
        assert!(!outcome.failed);
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_empty_tokens_never_match() {
        let engine = engine_with(vec![Document::new("b1", "Gaps", "a  b")]);
        assert!(engine.search_document("b1", "a b", false).await.matches.is_empty());
        assert!(engine.search_document("b1", "a  b", false).await.matches.is_empty());
    }

    #[tokio::test]
    async fn test_snippet_is_literal() {
        let engine = engine_with(vec![Document::new("b1", "Caps", "The Cat, sat")]);
        let outcome = engine.search_document("b1", "the cat", true).await;
        assert_eq!(outcome.matches[0].snippet, "The Cat, ");
    }

    #[tokio::test]
    async fn test_storage_error_fails_outcome() {
        let engine = SearchEngine::new(Arc::new(FailingStore));
        assert_eq!(engine.search_document("b1", "cat", false).await, SearchOutcome::failure());
        assert_eq!(engine.search_all("cat", false).await, SearchOutcome::failure());
    }

    #[tokio::test]
    async fn test_search_all_keeps_storage_order() {
        let engine = engine_with(vec![
            Document::new("b2", "Second", "a cat and the cat"),
            Document::new("b1", "First", CAT_TEXT),
            Document::new("b3", "Dogs", "only dogs here"),
        ]);
        let outcome = engine.search_all("cat", false).await;

        assert!(!outcome.failed);
        let found: Vec<(&str, usize)> = outcome
            .matches
            .iter()
            .map(|m| (m.document_id.as_str(), m.position))
            .collect();
        // "sat" and "mat" are one substitution away from "cat"
        assert_eq!(found, vec![("b2", 1), ("b2", 4), ("b1", 1), ("b1", 2), ("b1", 5)]);
    }

    #[tokio::test]
    async fn test_search_all_stop_after_one_is_per_document() {
        let engine = engine_with(vec![
            Document::new("b1", "One", "cat cat cat"),
            Document::new("b2", "Two", "cat cat"),
        ]);
        let outcome = engine.search_all("cat", true).await;

        let ids: Vec<&str> = outcome.matches.iter().map(|m| m.document_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_search_all_empty_store() {
        let engine = engine_with(vec![]);
        assert_eq!(engine.search_all("cat", false).await, SearchOutcome::default());
    }

    #[tokio::test]
    async fn test_search_all_propagates_document_failure() {
        let store = BrokenDocumentStore {
            inner: MemoryStore::with_documents([
                Document::new("ok", "Fine", CAT_TEXT),
                Document::new("bad", "Broken", CAT_TEXT),
            ]),
            broken_id: "bad",
        };
        let engine = SearchEngine::new(Arc::new(store));

        let outcome = engine.search_all("cat", false).await;
        assert!(outcome.failed);
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_search_all_order_with_concurrency() {
        let documents: Vec<Document> = (0..12)
            .map(|i| Document::new(format!("doc{}", i), format!("Doc {}", i), "filler the cat sat"))
            .collect();
        let options = SearchOptions {
            scan_concurrency: 5,
            cancel_check_interval: 1,
        };
        let engine = SearchEngine::with_options(
            Arc::new(MemoryStore::with_documents(documents)),
            options,
            CancellationToken::new(),
        );

        let outcome = engine.search_all("the cat", true).await;
        let ids: Vec<String> = outcome.matches.into_iter().map(|m| m.document_id).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("doc{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_cancelled_engine_fails() {
        let engine = engine_with(vec![Document::new("b1", "Cats", CAT_TEXT)]);
        engine.cancellation_token().cancel();

        assert!(engine.search_document("b1", "cat", false).await.failed);
        assert!(matches!(
            engine.try_search_all("cat", false).await,
            Err(SearchError::Cancelled)
        ));
    }

    #[test]
    fn test_scan_checks_cancellation_between_positions() {
        let document = Document::new("b1", "Long", "word ".repeat(64));
        let result = scan_until(&document, "missing", false, 8, || true);
        assert!(matches!(result, Err(SearchError::Cancelled)));
    }

    #[test]
    fn test_scan_document_pure() {
        let document = Document::new("b1", "Cats", CAT_TEXT);
        let matches = scan_document(&document, "on the mat", false);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].position, 3);
        assert_eq!(matches[0].snippet, "on the mat ");
    }

    #[test]
    fn test_snippet_trailing_space() {
        assert_eq!(snippet(&["a", "", "b"]), "a  b ");
        assert_eq!(snippet(&["one"]), "one ");
    }
}
