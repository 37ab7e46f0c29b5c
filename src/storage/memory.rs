//! In-process document store
//!
//! Same semantics as the SQLite store; nothing survives a restart.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{DocumentStore, StorageError};
use crate::models::Document;

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with documents, in order
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: RwLock::new(documents.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError> {
        Ok(self.documents.read().iter().find(|d| d.id == id).cloned())
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
        Ok(self.documents.read().clone())
    }

    async fn add_document(&self, document: Document) -> Result<(), StorageError> {
        let mut documents = self.documents.write();
        if documents.iter().any(|d| d.id == document.id) {
            return Err(StorageError::Duplicate(document.id));
        }
        documents.push(document);
        Ok(())
    }

    async fn update_document(&self, document: Document) -> Result<bool, StorageError> {
        let mut documents = self.documents.write();
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => {
                *existing = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_document(&self, id: &str) -> Result<bool, StorageError> {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }

    async fn remove_all(&self) -> Result<u64, StorageError> {
        let mut documents = self.documents.write();
        let removed = documents.len() as u64;
        documents.clear();
        Ok(removed)
    }
}
