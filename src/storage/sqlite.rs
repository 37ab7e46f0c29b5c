//! SQLite document store
//!
//! One `documents` table; `seq` keeps insertion order for listing while
//! `id` is the caller-visible unique key.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use super::{DocumentStore, StorageError};
use crate::models::Document;

pub struct SqliteStore {
    db: Pool<Sqlite>,
}

impl SqliteStore {
    /// Use an existing connection pool
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// Open a file database in WAL mode
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;

        // WAL for concurrent readers while a handler writes
        sqlx::query("PRAGMA journal_mode=WAL").execute(&db).await?;
        sqlx::query("PRAGMA busy_timeout=5000").execute(&db).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&db).await?;

        tracing::info!("Document database opened: {} (WAL mode)", database_url);

        Ok(Self { db })
    }

    /// Create the documents table if it does not exist
    pub async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                text TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError> {
        let document = sqlx::query_as::<_, Document>("SELECT id, name, text FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(document)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
        let documents = sqlx::query_as::<_, Document>("SELECT id, name, text FROM documents ORDER BY seq")
            .fetch_all(&self.db)
            .await?;
        Ok(documents)
    }

    async fn add_document(&self, document: Document) -> Result<(), StorageError> {
        let result = sqlx::query("INSERT INTO documents (id, name, text) VALUES (?, ?, ?)")
            .bind(&document.id)
            .bind(&document.name)
            .bind(&document.text)
            .execute(&self.db)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StorageError::Duplicate(document.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_document(&self, document: Document) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE documents SET name = ?, text = ? WHERE id = ?")
            .bind(&document.name)
            .bind(&document.text)
            .bind(&document.id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_document(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_all(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM documents")
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
