use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// A stored document. Only the storage layer creates or mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
    #[error("maxResults must be at least 1")]
    ZeroMaxResults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentRequest {
    #[serde(alias = "bookId")]
    pub id: String,
    #[serde(alias = "bookName")]
    pub name: String,
    pub text: String,
}

impl AddDocumentRequest {
    pub fn into_document(self) -> Result<Document, ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::Empty("id"));
        }
        Ok(Document::new(self.id, self.name, self.text))
    }
}

/// Edit request; omitted fields keep their stored value
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDocumentRequest {
    #[serde(alias = "bookId")]
    pub id: String,
    #[serde(default, alias = "bookName")]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl EditDocumentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::Empty("id"));
        }
        Ok(())
    }

    /// The full document when both fields were given, otherwise the request back
    pub fn into_complete(self) -> Result<Document, Self> {
        match (self.name, self.text) {
            (Some(name), Some(text)) => Ok(Document::new(self.id, name, text)),
            (name, text) => Err(Self { id: self.id, name, text }),
        }
    }

    /// Merge this request over the stored document
    pub fn apply_to(self, existing: Document) -> Document {
        Document {
            id: self.id,
            name: self.name.unwrap_or(existing.name),
            text: self.text.unwrap_or(existing.text),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDocumentRequest {
    #[serde(alias = "bookId")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOneRequest {
    #[serde(alias = "bookId")]
    pub document_id: String,
    #[serde(alias = "searchText")]
    pub query_text: String,
    pub stop_after_one: bool,
    #[serde(default)]
    pub peri_text_length: Option<u32>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAllRequest {
    #[serde(alias = "searchText")]
    pub query_text: String,
    pub stop_after_one: bool,
    #[serde(default)]
    pub peri_text_length: Option<u32>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Validated search input with config defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query_text: String,
    pub stop_after_one: bool,
    /// Accepted for compatibility; snippets are sized by the query's token count.
    pub peri_text_length: u32,
    /// Upper bound on returned matches, applied after the scan.
    pub max_results: usize,
}

impl SearchParams {
    pub fn resolve(
        query_text: String,
        stop_after_one: bool,
        peri_text_length: Option<u32>,
        max_results: Option<usize>,
        defaults: &SearchConfig,
    ) -> Result<Self, ValidationError> {
        let max_results = max_results.unwrap_or(defaults.max_results);
        if max_results == 0 {
            return Err(ValidationError::ZeroMaxResults);
        }
        Ok(Self {
            query_text,
            stop_after_one,
            peri_text_length: peri_text_length.unwrap_or(defaults.peri_text_length),
            max_results,
        })
    }
}

impl SearchOneRequest {
    pub fn into_params(self, defaults: &SearchConfig) -> Result<(String, SearchParams), ValidationError> {
        let params = SearchParams::resolve(
            self.query_text,
            self.stop_after_one,
            self.peri_text_length,
            self.max_results,
            defaults,
        )?;
        Ok((self.document_id, params))
    }
}

impl SearchAllRequest {
    pub fn into_params(self, defaults: &SearchConfig) -> Result<SearchParams, ValidationError> {
        SearchParams::resolve(
            self.query_text,
            self.stop_after_one,
            self.peri_text_length,
            self.max_results,
            defaults,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_defaults() {
        let defaults = SearchConfig::default();
        let params = SearchParams::resolve("the cat".to_string(), true, None, None, &defaults).unwrap();
        assert_eq!(params.peri_text_length, 15);
        assert_eq!(params.max_results, 50);
        assert!(params.stop_after_one);
    }

    #[test]
    fn test_search_params_rejects_zero_max_results() {
        let defaults = SearchConfig::default();
        let err = SearchParams::resolve(String::new(), false, None, Some(0), &defaults).unwrap_err();
        assert_eq!(err, ValidationError::ZeroMaxResults);
    }

    #[test]
    fn test_search_request_accepts_book_field_names() {
        let req: SearchOneRequest = serde_json::from_str(
            r#"{"bookId": "b1", "searchText": "the cat", "stopAfterOne": false, "maxResults": 3}"#,
        )
        .unwrap();
        let (id, params) = req.into_params(&SearchConfig::default()).unwrap();
        assert_eq!(id, "b1");
        assert_eq!(params.query_text, "the cat");
        assert_eq!(params.max_results, 3);
    }

    #[test]
    fn test_search_request_requires_stop_after_one() {
        let parsed = serde_json::from_str::<SearchAllRequest>(r#"{"queryText": "cat"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_edit_request_merges_over_existing() {
        let req: EditDocumentRequest = serde_json::from_str(r#"{"id": "d1", "name": "Renamed"}"#).unwrap();
        let req = req.into_complete().unwrap_err();
        let merged = req.apply_to(Document::new("d1", "Old", "kept text"));
        assert_eq!(merged, Document::new("d1", "Renamed", "kept text"));
    }

    #[test]
    fn test_edit_request_complete() {
        let req: EditDocumentRequest =
            serde_json::from_str(r#"{"bookId": "d1", "bookName": "N", "text": "T"}"#).unwrap();
        assert_eq!(req.into_complete().unwrap(), Document::new("d1", "N", "T"));
    }

    #[test]
    fn test_add_request_rejects_empty_id() {
        let req: AddDocumentRequest = serde_json::from_str(r#"{"id": "", "name": "n", "text": "t"}"#).unwrap();
        assert_eq!(req.into_document().unwrap_err(), ValidationError::Empty("id"));
    }
}
