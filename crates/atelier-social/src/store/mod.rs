//! Store - Social graph persistence using SQLite
//!
//! This module provides the storage layer for users, tags, posts and the
//! likes, bookmarks, comments and follows that connect them.

mod helpers;
mod social_store;
mod traits;


pub use helpers::{default_data_dir, default_db_path};
pub use social_store::{SocialStore, MIN_COMMENT_LEN, READING_LIST_LIMIT};
pub use traits::SocialGraphStore;

#[cfg(test)]
pub use traits::MockSocialGraphStore;
