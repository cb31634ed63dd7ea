//! Helper functions for store module

use crate::error::{Error, Result};
use crate::model::{Comment, FeedPost, Post, PostAuthor, Tag, User, UserSummary};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Fixed-width RFC 3339 timestamp so stored values sort lexically
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("invalid timestamp: {e}")))
}

/// Convert a SQLite row to a User
pub(crate) fn row_to_user(row: &SqliteRow) -> Result<User> {
    let created_at: String = row.get("created_at");
    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        username: row.get("username"),
        image: row.get("image"),
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Convert a SQLite row to a UserSummary
pub(crate) fn row_to_summary(row: &SqliteRow) -> UserSummary {
    UserSummary {
        id: row.get("id"),
        name: row.get("name"),
        username: row.get("username"),
    }
}

/// Convert a SQLite row to a Tag
pub(crate) fn row_to_tag(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
    }
}

/// Convert a joined comment/user row to a Comment
pub(crate) fn row_to_comment(row: &SqliteRow) -> Result<Comment> {
    let created_at: String = row.get("created_at");
    Ok(Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        user: UserSummary {
            id: row.get("user_id"),
            name: row.get("user_name"),
            username: row.get("username"),
        },
        text: row.get("text"),
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Convert a joined post/author row plus its tag names to a FeedPost
pub(crate) fn row_to_feed_post(row: &SqliteRow, tags: Vec<String>) -> Result<FeedPost> {
    let created_at: String = row.get("created_at");
    Ok(FeedPost {
        post: Post {
            id: row.get("id"),
            author_id: row.get("author_id"),
            title: row.get("title"),
            slug: row.get("slug"),
            description: row.get("description"),
            featured_image: row.get("featured_image"),
            tags,
            created_at: parse_timestamp(&created_at)?,
        },
        author: PostAuthor {
            id: row.get("author_id"),
            name: row.get("author_name"),
            username: row.get("author_username"),
            image: row.get("author_image"),
        },
        bookmarked: row.get::<i64, _>("bookmarked") != 0,
        liked: row.get::<i64, _>("liked") != 0,
    })
}

/// Get the default data directory for Atelier
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".atelier"))
        .unwrap_or_else(|| std::path::PathBuf::from(".atelier"))
}

/// Get the default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("atelier.db")
}
