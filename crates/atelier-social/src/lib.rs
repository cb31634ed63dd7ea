//! Atelier Social - Social Graph and Suggestions
//!
//! This crate provides the community side of Atelier:
//! - Model: users, tags, posts and comments
//! - Store: SQLite persistence for the graph (likes, bookmarks, follows)
//! - Suggestions: interest-based "who to follow" recommendations
//! - Error: Error types for social graph operations
//!
//! ## Usage
//!
//! ```ignore
//! use atelier_social::{SocialStore, SuggestionEngine};
//!
//! let store = SocialStore::in_memory().await?;
//! let engine = SuggestionEngine::new(store.clone());
//! for user in engine.get_suggestions(&user_id).await? {
//!     println!("{} (@{})", user.name, user.username);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod slug;
pub mod store;
pub mod suggestions;

// Re-export main types
pub use error::{Error, Result};
pub use model::{
    Comment, FeedPost, NewPost, Post, PostAuthor, Tag, User, UserProfile, UserSummary,
};
pub use store::{
    default_data_dir, default_db_path, SocialGraphStore, SocialStore, READING_LIST_LIMIT,
};
pub use suggestions::{SuggestionConfig, SuggestionEngine};
