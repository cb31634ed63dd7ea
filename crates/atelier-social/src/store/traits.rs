//! Trait for social graph storage backends

use crate::error::Result;
use crate::model::UserSummary;
use std::collections::BTreeSet;

/// Read side of the social graph used by the suggestion engine
///
/// Implementations must treat every call as a plain read: no retries and no
/// caching. Connectivity failures surface as `Error::DataStoreUnavailable`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SocialGraphStore: Send + Sync {
    /// Tag names of the posts behind the user's `window` most recent likes
    async fn recent_like_tags(&self, user_id: &str, window: u32) -> Result<Vec<String>>;

    /// Tag names of the posts behind the user's `window` most recent bookmarks
    async fn recent_bookmark_tags(&self, user_id: &str, window: u32) -> Result<Vec<String>>;

    /// Users other than `exclude_user_id` who liked or bookmarked at least one
    /// post carrying any of `tags`, ordered by account creation then id
    async fn users_engaged_with_tags(
        &self,
        tags: &BTreeSet<String>,
        exclude_user_id: &str,
        limit: u32,
    ) -> Result<Vec<UserSummary>>;

    /// Get the store name (for logging)
    fn name(&self) -> &str;
}
