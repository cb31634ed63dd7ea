//! SocialStore - SQLite-based social graph storage

use super::helpers::{
    format_timestamp, parse_timestamp, row_to_comment, row_to_feed_post, row_to_summary,
    row_to_tag, row_to_user,
};
use super::traits::SocialGraphStore;
use crate::error::{Error, Result};
use crate::model::{Comment, FeedPost, NewPost, Post, Tag, User, UserProfile, UserSummary};
use crate::slug::slugify;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Minimum length of a comment body after trimming
pub const MIN_COMMENT_LEN: usize = 3;

/// Number of bookmarks shown in a reading list
pub const READING_LIST_LIMIT: u32 = 4;

/// Post columns joined with the author, followed by the viewer's engagement flags
const FEED_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.title, p.slug, p.description, p.featured_image, p.created_at,
           u.name AS author_name, u.username AS author_username, u.image AS author_image,
           EXISTS (SELECT 1 FROM bookmarks vb WHERE vb.post_id = p.id AND vb.user_id = "#;

/// Tables holding a user's engagement with posts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engagement {
    Like,
    Bookmark,
}

impl Engagement {
    fn table(self) -> &'static str {
        match self {
            Self::Like => "likes",
            Self::Bookmark => "bookmarks",
        }
    }
}

/// Social graph store for users, posts, tags and their relationships
#[derive(Clone)]
pub struct SocialStore {
    pool: SqlitePool,
}

impl SocialStore {
    /// Create a new social store with the given connection pool
    ///
    /// Call [`SocialStore::init`] before use when the schema may be missing.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new social store from a database path
    ///
    /// This will create the database file if it doesn't exist and run migrations.
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Database(format!("failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        let store = Self { pool };
        store.init().await?;

        info!("SQLite social store initialized at {}", db_path.display());
        Ok(store)
    }

    /// Create a new in-memory social store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init().await?;

        debug!("In-memory SQLite social store initialized");
        Ok(store)
    }

    /// Underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                image TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                featured_image TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS post_tags (
                post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (post_id, tag_id)
            );

            CREATE TABLE IF NOT EXISTS likes (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, post_id)
            );

            CREATE TABLE IF NOT EXISTS bookmarks (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, post_id)
            );

            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS follows (
                follower_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                following_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (follower_id, following_id)
            );

            CREATE INDEX IF NOT EXISTS idx_likes_user ON likes(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_bookmarks_user ON bookmarks(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_post_tags_tag ON post_tags(tag_id);
            CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Register a user
    #[instrument(skip(self, image))]
    pub async fn create_user(
        &self,
        name: &str,
        username: &str,
        image: Option<&str>,
    ) -> Result<User> {
        if name.trim().is_empty() || username.trim().is_empty() {
            return Err(Error::invalid_request("name and username are required"));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            username: username.trim().to_string(),
            image: image.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, name, username, image, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.image)
        .bind(format_timestamp(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::conflict(format!("username {} is taken", user.username)),
            other => other,
        })?;

        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let row = sqlx::query(
            r#"
            SELECT id, name, username, image, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found(format!("user {user_id}")))?;

        row_to_user(&row)
    }

    /// Get a user by their unique handle
    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        let row = sqlx::query(
            r#"
            SELECT id, name, username, image, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found(format!("user @{username}")))?;

        row_to_user(&row)
    }

    /// Get a user's public profile with post and follow counts
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile> {
        self.profile_where("id", user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {user_id}")))
    }

    /// Get a public profile by handle
    pub async fn get_profile_by_username(&self, username: &str) -> Result<UserProfile> {
        self.profile_where("username", username)
            .await?
            .ok_or_else(|| Error::not_found(format!("user @{username}")))
    }

    async fn profile_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<UserProfile>> {
        let sql = format!(
            r#"
            SELECT u.id, u.name, u.username, u.image,
                   (SELECT COUNT(*) FROM posts p WHERE p.author_id = u.id) AS post_count,
                   (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS follower_count,
                   (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count
            FROM users u
            WHERE u.{column} = ?
            "#
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| UserProfile {
            id: row.get("id"),
            name: row.get("name"),
            username: row.get("username"),
            image: row.get("image"),
            post_count: row.get("post_count"),
            follower_count: row.get("follower_count"),
            following_count: row.get("following_count"),
        }))
    }

    async fn ensure_user(&self, user_id: &str) -> Result<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        exists
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("user {user_id}")))
    }

    async fn ensure_post(&self, post_id: &str) -> Result<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;
        exists
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("post {post_id}")))
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Create a tag; names are unique
    #[instrument(skip(self, description))]
    pub async fn create_tag(&self, name: &str, description: &str) -> Result<Tag> {
        let name = name.trim();
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(Error::invalid_request("tag name must contain letters or digits"));
        }

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM tags WHERE name = ? OR slug = ?")
                .bind(name)
                .bind(&slug)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(Error::conflict(format!("tag {name} already exists")));
        }

        let tag = Tag {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug,
            description: description.to_string(),
        };

        sqlx::query("INSERT INTO tags (id, name, slug, description) VALUES (?, ?, ?, ?)")
            .bind(&tag.id)
            .bind(&tag.name)
            .bind(&tag.slug)
            .bind(&tag.description)
            .execute(&self.pool)
            .await?;

        debug!(tag_id = %tag.id, "Tag created");
        Ok(tag)
    }

    /// List all tags by name
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug, description FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(row_to_tag).collect())
    }

    // ========================================================================
    // Posts
    // ========================================================================

    /// Create a post and connect its tags
    #[instrument(skip(self, new_post), fields(title = %new_post.title))]
    pub async fn create_post(&self, author_id: &str, new_post: NewPost) -> Result<Post> {
        let title = new_post.title.trim().to_string();
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(Error::invalid_request("post title must contain letters or digits"));
        }
        self.ensure_user(author_id).await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM posts WHERE title = ? OR slug = ?")
                .bind(&title)
                .bind(&slug)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(Error::conflict(format!("post {title} already exists")));
        }

        let tag_ids: BTreeSet<String> = new_post.tag_ids.into_iter().collect();
        let mut tags = Vec::with_capacity(tag_ids.len());
        for tag_id in &tag_ids {
            let name: Option<String> = sqlx::query_scalar("SELECT name FROM tags WHERE id = ?")
                .bind(tag_id)
                .fetch_optional(&self.pool)
                .await?;
            tags.push(name.ok_or_else(|| Error::not_found(format!("tag {tag_id}")))?);
        }
        tags.sort();

        let post = Post {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.to_string(),
            title,
            slug,
            description: new_post.description,
            featured_image: new_post.featured_image,
            tags,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, slug, description, featured_image, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.description)
        .bind(&post.featured_image)
        .bind(format_timestamp(post.created_at))
        .execute(&mut *tx)
        .await?;

        for tag_id in &tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(&post.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!(post_id = %post.id, tags = post.tags.len(), "Post created");
        Ok(post)
    }

    /// Get a post with its tag names
    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        let row = sqlx::query(
            r#"
            SELECT id, author_id, title, slug, description, featured_image, created_at
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found(format!("post {post_id}")))?;

        let tags = self.post_tag_names(post_id).await?;

        let created_at: String = row.get("created_at");
        Ok(Post {
            id: row.get("id"),
            author_id: row.get("author_id"),
            title: row.get("title"),
            slug: row.get("slug"),
            description: row.get("description"),
            featured_image: row.get("featured_image"),
            tags,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    async fn post_tag_names(&self, post_id: &str) -> Result<Vec<String>> {
        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT t.name
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ?
            ORDER BY t.name ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    /// Start a feed query; callers append joins, filters and ordering
    fn feed_query<'a>(viewer_id: Option<&str>) -> QueryBuilder<'a, Sqlite> {
        let viewer = viewer_id.map(str::to_string);
        let mut builder = QueryBuilder::<Sqlite>::new(FEED_SELECT);
        builder.push_bind(viewer.clone());
        builder.push(
            ") AS bookmarked, EXISTS (SELECT 1 FROM likes vl WHERE vl.post_id = p.id AND vl.user_id = ",
        );
        builder.push_bind(viewer);
        builder.push(") AS liked FROM posts p JOIN users u ON u.id = p.author_id");
        builder
    }

    async fn fetch_feed(&self, mut builder: QueryBuilder<'_, Sqlite>) -> Result<Vec<FeedPost>> {
        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in &rows {
            let post_id: String = row.get("id");
            let tags = self.post_tag_names(&post_id).await?;
            posts.push(row_to_feed_post(row, tags)?);
        }
        Ok(posts)
    }

    /// All posts, newest first, flagged with the viewer's likes and bookmarks
    pub async fn list_posts(&self, viewer_id: Option<&str>) -> Result<Vec<FeedPost>> {
        let mut builder = Self::feed_query(viewer_id);
        builder.push(" ORDER BY p.created_at DESC, p.rowid DESC");
        self.fetch_feed(builder).await
    }

    /// Get a post by slug
    pub async fn get_post_by_slug(&self, slug: &str, viewer_id: Option<&str>) -> Result<FeedPost> {
        let mut builder = Self::feed_query(viewer_id);
        builder.push(" WHERE p.slug = ");
        builder.push_bind(slug.to_string());
        self.fetch_feed(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("post {slug}")))
    }

    /// Posts written by the user with `username`, newest first
    pub async fn list_user_posts(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> Result<Vec<FeedPost>> {
        let author = self.get_user_by_username(username).await?;
        let mut builder = Self::feed_query(viewer_id);
        builder.push(" WHERE p.author_id = ");
        builder.push_bind(author.id);
        builder.push(" ORDER BY p.created_at DESC, p.rowid DESC");
        self.fetch_feed(builder).await
    }

    /// Featured painting of a post, if any
    pub async fn post_featured_image(&self, post_id: &str) -> Result<Option<String>> {
        let image: Option<Option<String>> =
            sqlx::query_scalar("SELECT featured_image FROM posts WHERE id = ?")
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;
        image.ok_or_else(|| Error::not_found(format!("post {post_id}")))
    }

    // ========================================================================
    // Likes and bookmarks
    // ========================================================================

    async fn engage(&self, kind: Engagement, user_id: &str, post_id: &str) -> Result<()> {
        self.ensure_user(user_id).await?;
        self.ensure_post(post_id).await?;

        let sql = format!(
            "INSERT OR IGNORE INTO {} (user_id, post_id, created_at) VALUES (?, ?, ?)",
            kind.table()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(post_id)
            .bind(format_timestamp(Utc::now()))
            .execute(&self.pool)
            .await?;

        debug!(user_id, post_id, kind = kind.table(), "Engagement recorded");
        Ok(())
    }

    /// Like a post; liking twice keeps the first like
    pub async fn like_post(&self, user_id: &str, post_id: &str) -> Result<()> {
        self.engage(Engagement::Like, user_id, post_id).await
    }

    /// Bookmark a post; bookmarking twice keeps the first bookmark
    pub async fn bookmark_post(&self, user_id: &str, post_id: &str) -> Result<()> {
        self.engage(Engagement::Bookmark, user_id, post_id).await
    }

    /// Remove a bookmark
    pub async fn remove_bookmark(&self, user_id: &str, post_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND post_id = ?")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("bookmark {user_id}/{post_id}")));
        }
        Ok(())
    }

    /// Most recently bookmarked posts of a user
    pub async fn reading_list(&self, user_id: &str, limit: u32) -> Result<Vec<FeedPost>> {
        self.ensure_user(user_id).await?;
        let mut builder = Self::feed_query(Some(user_id));
        builder.push(" JOIN bookmarks rb ON rb.post_id = p.id WHERE rb.user_id = ");
        builder.push_bind(user_id.to_string());
        builder.push(" ORDER BY rb.created_at DESC, rb.rowid DESC LIMIT ");
        builder.push_bind(i64::from(limit));
        self.fetch_feed(builder).await
    }

    /// Featured paintings of every post the user bookmarked, newest bookmark first
    pub async fn bookmark_images(&self, user_id: &str) -> Result<Vec<String>> {
        self.ensure_user(user_id).await?;
        let images: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT p.featured_image
            FROM bookmarks b
            JOIN posts p ON p.id = b.post_id
            WHERE b.user_id = ? AND p.featured_image IS NOT NULL
            ORDER BY b.created_at DESC, b.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    async fn recent_tags(&self, kind: Engagement, user_id: &str, window: u32) -> Result<Vec<String>> {
        // rowid breaks ties between engagements stamped in the same microsecond
        let sql = format!(
            r#"
            SELECT t.name
            FROM (
                SELECT post_id
                FROM {table}
                WHERE user_id = ?
                ORDER BY created_at DESC, rowid DESC
                LIMIT ?
            ) recent
            JOIN post_tags pt ON pt.post_id = recent.post_id
            JOIN tags t ON t.id = pt.tag_id
            "#,
            table = kind.table()
        );

        let tags: Vec<String> = sqlx::query_scalar(&sql)
            .bind(user_id)
            .bind(i64::from(window))
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Comment on a post
    #[instrument(skip(self, text))]
    pub async fn add_comment(&self, user_id: &str, post_id: &str, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.chars().count() < MIN_COMMENT_LEN {
            return Err(Error::invalid_request(format!(
                "comment must be at least {MIN_COMMENT_LEN} characters"
            )));
        }
        let user = self.get_user(user_id).await?;
        self.ensure_post(post_id).await?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.to_string(),
            user: UserSummary {
                id: user.id,
                name: user.name,
                username: user.username,
            },
            text: text.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO comments (id, user_id, post_id, text, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&comment.id)
        .bind(&comment.user.id)
        .bind(&comment.post_id)
        .bind(&comment.text)
        .bind(format_timestamp(comment.created_at))
        .execute(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comments on a post, newest first
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.post_id, c.text, c.created_at,
                   u.id AS user_id, u.name AS user_name, u.username
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ?
            ORDER BY c.created_at DESC, c.rowid DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_comment).collect()
    }

    // ========================================================================
    // Follows
    // ========================================================================

    /// Follow another user; following twice is a no-op
    #[instrument(skip(self))]
    pub async fn follow(&self, follower_id: &str, following_id: &str) -> Result<()> {
        if follower_id == following_id {
            return Err(Error::invalid_request("users cannot follow themselves"));
        }
        self.ensure_user(follower_id).await?;
        self.ensure_user(following_id).await?;

        sqlx::query(
            "INSERT OR IGNORE INTO follows (follower_id, following_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(follower_id)
        .bind(following_id)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stop following a user, returning whether a follow existed
    #[instrument(skip(self))]
    pub async fn unfollow(&self, follower_id: &str, following_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Users following `user_id`
    pub async fn followers(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        self.ensure_user(user_id).await?;
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.username
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = ?
            ORDER BY f.created_at ASC, u.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_summary).collect())
    }

    /// Users `user_id` follows
    pub async fn following(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        self.ensure_user(user_id).await?;
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.username
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = ?
            ORDER BY f.created_at ASC, u.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_summary).collect())
    }
}

/// Push `EXISTS (...)` matching engagement of `u` with any post tagged from `tags`
fn push_engagement_filter(
    builder: &mut QueryBuilder<'_, Sqlite>,
    kind: Engagement,
    tags: &BTreeSet<String>,
) {
    builder.push(format!(
        " EXISTS (SELECT 1 FROM {} e \
           JOIN post_tags pt ON pt.post_id = e.post_id \
           JOIN tags t ON t.id = pt.tag_id \
           WHERE e.user_id = u.id AND t.name IN (",
        kind.table()
    ));
    let mut names = builder.separated(", ");
    for tag in tags {
        names.push_bind(tag.clone());
    }
    names.push_unseparated("))");
}

#[async_trait::async_trait]
impl SocialGraphStore for SocialStore {
    async fn recent_like_tags(&self, user_id: &str, window: u32) -> Result<Vec<String>> {
        self.recent_tags(Engagement::Like, user_id, window).await
    }

    async fn recent_bookmark_tags(&self, user_id: &str, window: u32) -> Result<Vec<String>> {
        self.recent_tags(Engagement::Bookmark, user_id, window).await
    }

    #[instrument(skip(self, tags), fields(tag_count = tags.len()))]
    async fn users_engaged_with_tags(
        &self,
        tags: &BTreeSet<String>,
        exclude_user_id: &str,
        limit: u32,
    ) -> Result<Vec<UserSummary>> {
        if tags.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT u.id, u.name, u.username FROM users u WHERE u.id <> ");
        builder.push_bind(exclude_user_id.to_string());
        builder.push(" AND (");
        push_engagement_filter(&mut builder, Engagement::Like, tags);
        builder.push(" OR");
        push_engagement_filter(&mut builder, Engagement::Bookmark, tags);
        builder.push(") ORDER BY u.created_at ASC, u.id ASC LIMIT ");
        builder.push_bind(i64::from(limit));

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_summary).collect())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
