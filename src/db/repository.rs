//! Key-value repository for per-user collections.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// The three per-user collections and their storage key prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Assessments,
    Journal,
    Mood,
}

impl Collection {
    pub fn prefix(self) -> &'static str {
        match self {
            Collection::Assessments => "assessments",
            Collection::Journal => "journal",
            Collection::Mood => "mood",
        }
    }

    /// Storage key of this collection for one user.
    pub fn key(self, user_id: &str) -> String {
        format!("{}-{}", self.prefix(), user_id)
    }
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the raw value stored under a key.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM user_data WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Insert or replace the value stored under a key.
    pub async fn put_value(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO user_data (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load a user's collection, `None` when nothing has been stored yet.
    pub async fn load_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> Result<Option<Vec<T>>, AppError> {
        match self.get_value(&collection.key(user_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(|e| {
                AppError::Storage(format!(
                    "Corrupt {} collection for {}: {}",
                    collection.prefix(),
                    user_id,
                    e
                ))
            })?)),
            None => Ok(None),
        }
    }

    /// Replace a user's stored collection with `items`.
    pub async fn save_collection<T: Serialize>(
        &self,
        collection: Collection,
        user_id: &str,
        items: &[T],
    ) -> Result<(), AppError> {
        let raw = serde_json::to_string(items)
            .map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?;
        self.put_value(&collection.key(user_id), &raw).await
    }

    /// Close the underlying pool. Later operations fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
