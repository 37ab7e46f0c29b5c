//! Document storage
//!
//! The search core only reads through `get_document` and `list_documents`;
//! the write operations exist for the document CRUD handlers.

use async_trait::async_trait;

use crate::models::Document;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document already exists: {0}")]
    Duplicate(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage collaborator for documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document; `Ok(None)` when the id is unknown
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError>;

    /// All documents in insertion order
    async fn list_documents(&self) -> Result<Vec<Document>, StorageError>;

    /// Insert a new document; fails with `Duplicate` if the id exists
    async fn add_document(&self, document: Document) -> Result<(), StorageError>;

    /// Replace name and text of an existing document; `false` if it does not exist
    async fn update_document(&self, document: Document) -> Result<bool, StorageError>;

    /// Remove a document; `false` if it did not exist
    async fn remove_document(&self, id: &str) -> Result<bool, StorageError>;

    /// Remove every document, returning how many were removed
    async fn remove_all(&self) -> Result<u64, StorageError>;
}
