//! Social graph entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Avatar URL
    pub image: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Minimal user reference (suggestions, follower lists)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
}

/// Public profile with relationship counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Avatar URL
    pub image: Option<String>,
    /// Number of authored posts
    pub post_count: i64,
    /// Number of users following this user
    pub follower_count: i64,
    /// Number of users this user follows
    pub following_count: i64,
}

/// A content tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag ID
    pub id: String,
    /// Unique name
    pub name: String,
    /// URL-safe name
    pub slug: String,
    /// Free-form description
    pub description: String,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID
    pub id: String,
    /// Author user ID
    pub author_id: String,
    /// Unique title
    pub title: String,
    /// URL-safe title
    pub slug: String,
    /// Short description
    pub description: String,
    /// Painting ID shown with the post
    pub featured_image: Option<String>,
    /// Tag names attached to the post
    pub tags: Vec<String>,
    /// When the post was created
    pub created_at: DateTime<Utc>,
}

/// Author details shown alongside a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Avatar URL
    pub image: Option<String>,
}

/// A post as listed in feeds, with its author and the viewer's engagement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    /// The post itself
    #[serde(flatten)]
    pub post: Post,
    /// Post author
    pub author: PostAuthor,
    /// Whether the viewer bookmarked the post
    pub bookmarked: bool,
    /// Whether the viewer liked the post
    pub liked: bool,
}

/// Input for creating a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    /// Unique title
    pub title: String,
    /// Short description
    pub description: String,
    /// Tags to attach
    #[serde(default)]
    pub tag_ids: Vec<String>,
    /// Painting to feature
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    pub id: String,
    /// Post commented on
    pub post_id: String,
    /// Comment author
    pub user: UserSummary,
    /// Comment body
    pub text: String,
    /// When the comment was written
    pub created_at: DateTime<Utc>,
}
