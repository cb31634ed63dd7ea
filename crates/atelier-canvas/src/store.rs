//! Painting Store
//!
//! This module provides persistent storage for exported paintings using SQLite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A saved painting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Painting {
    /// Painting ID
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Image payload, usually a PNG data URL
    pub image: String,
    /// When the painting was saved
    pub created_at: DateTime<Utc>,
}

/// SQLite-based painting store
#[derive(Clone)]
pub struct PaintingStore {
    pool: SqlitePool,
}

impl PaintingStore {
    /// Create a new painting store with the given database pool
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS paintings (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                image TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_paintings_user_id ON paintings(user_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Save an image for a user
    #[instrument(skip(self, image), fields(image_len = image.len()))]
    pub async fn save_painting(&self, user_id: &str, image: &str) -> Result<Painting> {
        if user_id.trim().is_empty() {
            return Err(Error::invalid_argument("user id must not be empty"));
        }
        if image.trim().is_empty() {
            return Err(Error::invalid_argument("image must not be empty"));
        }

        let painting = Painting {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            image: image.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO paintings (id, user_id, image, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&painting.id)
        .bind(&painting.user_id)
        .bind(&painting.image)
        .bind(painting.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(painting_id = %painting.id, "Painting saved");
        Ok(painting)
    }

    /// List a user's paintings, oldest first
    pub async fn list_paintings(&self, user_id: &str) -> Result<Vec<Painting>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, image, created_at
            FROM paintings
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_painting).collect()
    }

    /// Load a single painting
    pub async fn get_painting(&self, painting_id: &str) -> Result<Painting> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, image, created_at
            FROM paintings
            WHERE id = ?
            "#,
        )
        .bind(painting_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row_to_painting(&row),
            None => Err(Error::PaintingNotFound(painting_id.to_string())),
        }
    }

    /// Delete a painting
    pub async fn delete_painting(&self, painting_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM paintings WHERE id = ?")
            .bind(painting_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_painting(row: &sqlx::sqlite::SqliteRow) -> Result<Painting> {
    let created_at: String = row.get("created_at");
    Ok(Painting {
        id: row.get("id"),
        user_id: row.get("user_id"),
        image: row.get("image"),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Serialization(format!("invalid timestamp: {e}")))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> PaintingStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let store = PaintingStore::new(pool);
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_painting_save_and_get() {
        let store = setup_test_db().await;

        let saved = store
            .save_painting("user1", "data:image/png;base64,AAAA")
            .await
            .unwrap();
        let loaded = store.get_painting(&saved.id).await.unwrap();

        assert_eq!(loaded.user_id, "user1");
        assert_eq!(loaded.image, "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn test_painting_rejects_empty_input() {
        let store = setup_test_db().await;

        let err = store.save_painting("", "img").await.unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        let err = store.save_painting("user1", "  ").await.unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_get_missing_painting() {
        let store = setup_test_db().await;
        let err = store.get_painting("missing").await.unwrap_err();
        assert_eq!(err.code(), "painting_not_found");
    }

    #[tokio::test]
    async fn test_list_user_paintings() {
        let store = setup_test_db().await;

        store.save_painting("user1", "a").await.unwrap();
        store.save_painting("user1", "b").await.unwrap();
        store.save_painting("user2", "c").await.unwrap();

        assert_eq!(store.list_paintings("user1").await.unwrap().len(), 2);
        assert_eq!(store.list_paintings("user2").await.unwrap().len(), 1);
        assert!(store.list_paintings("user3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_painting() {
        let store = setup_test_db().await;

        let saved = store.save_painting("user1", "a").await.unwrap();
        assert!(store.delete_painting(&saved.id).await.unwrap());
        assert!(!store.delete_painting(&saved.id).await.unwrap());
        assert!(store.get_painting(&saved.id).await.is_err());
    }
}
