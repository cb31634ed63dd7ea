//! Interest-based user suggestions
//!
//! A user's interests are the tags of the posts behind their most recent
//! likes and bookmarks, taken as a flat set. Suggestions are other users who
//! engaged with at least one post carrying any of those tags.

use crate::error::{Error, Result};
use crate::model::UserSummary;
use crate::store::SocialGraphStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Default number of recent likes contributing tags
pub const DEFAULT_LIKE_WINDOW: u32 = 10;
/// Default number of recent bookmarks contributing tags
pub const DEFAULT_BOOKMARK_WINDOW: u32 = 10;
/// Default maximum number of suggestions
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 4;

/// Suggestion tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Recent likes considered
    #[serde(default = "default_like_window")]
    pub like_window: u32,
    /// Recent bookmarks considered
    #[serde(default = "default_bookmark_window")]
    pub bookmark_window: u32,
    /// Maximum suggestions returned
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_like_window() -> u32 {
    DEFAULT_LIKE_WINDOW
}

fn default_bookmark_window() -> u32 {
    DEFAULT_BOOKMARK_WINDOW
}

fn default_limit() -> u32 {
    DEFAULT_SUGGESTION_LIMIT
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            like_window: DEFAULT_LIKE_WINDOW,
            bookmark_window: DEFAULT_BOOKMARK_WINDOW,
            limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

/// Computes suggestions against a social graph store
#[derive(Clone)]
pub struct SuggestionEngine<S> {
    store: S,
    config: SuggestionConfig,
}

impl<S: SocialGraphStore> SuggestionEngine<S> {
    /// Create an engine with default windows and limit
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, SuggestionConfig::default())
    }

    /// Create an engine with explicit tuning
    #[must_use]
    pub fn with_config(store: S, config: SuggestionConfig) -> Self {
        Self { store, config }
    }

    /// Current tuning
    #[must_use]
    pub fn config(&self) -> SuggestionConfig {
        self.config
    }

    /// Interest set of a user: tags from recent likes and bookmarks
    pub async fn interests(&self, user_id: &str) -> Result<BTreeSet<String>> {
        let liked = self
            .store
            .recent_like_tags(user_id, self.config.like_window)
            .await?;
        let bookmarked = self
            .store
            .recent_bookmark_tags(user_id, self.config.bookmark_window)
            .await?;

        Ok(liked.into_iter().chain(bookmarked).collect())
    }

    /// Up to `limit` users sharing the requester's tag interests
    ///
    /// The requester is never part of the result. Users are ordered by
    /// account creation and carry no relevance ranking. An empty interest
    /// set yields an empty list without querying for candidates.
    #[instrument(skip(self))]
    pub async fn get_suggestions(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        if user_id.trim().is_empty() {
            return Err(Error::invalid_request("user id must not be empty"));
        }

        let interests = self.interests(user_id).await?;
        if interests.is_empty() {
            debug!("No recent likes or bookmarks, nothing to suggest");
            return Ok(Vec::new());
        }

        let limit = self.config.limit;
        let candidates = self
            .store
            .users_engaged_with_tags(&interests, user_id, limit)
            .await?;

        let suggestions: Vec<UserSummary> = candidates
            .into_iter()
            .filter(|candidate| candidate.id != user_id)
            .take(limit as usize)
            .collect();

        debug!(
            interests = interests.len(),
            suggestions = suggestions.len(),
            "Suggestions computed"
        );
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockSocialGraphStore;

    fn summary(id: &str) -> UserSummary {
        UserSummary {
            id: id.to_string(),
            name: format!("Name {id}"),
            username: format!("user_{id}"),
        }
    }

    fn mock_with_tags(likes: Vec<&str>, bookmarks: Vec<&str>) -> MockSocialGraphStore {
        let likes: Vec<String> = likes.into_iter().map(String::from).collect();
        let bookmarks: Vec<String> = bookmarks.into_iter().map(String::from).collect();

        let mut store = MockSocialGraphStore::new();
        store
            .expect_recent_like_tags()
            .withf(|_, window| *window == DEFAULT_LIKE_WINDOW)
            .returning(move |_, _| Ok(likes.clone()));
        store
            .expect_recent_bookmark_tags()
            .withf(|_, window| *window == DEFAULT_BOOKMARK_WINDOW)
            .returning(move |_, _| Ok(bookmarks.clone()));
        store
    }

    #[tokio::test]
    async fn test_empty_history_skips_candidate_query() {
        let mut store = mock_with_tags(vec![], vec![]);
        store.expect_users_engaged_with_tags().never();

        let engine = SuggestionEngine::new(store);
        let suggestions = engine.get_suggestions("alice").await.unwrap();
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_interest_set_is_flat_union() {
        let mut store = mock_with_tags(vec!["portrait", "oil", "portrait"], vec!["oil", "sketch"]);
        store
            .expect_users_engaged_with_tags()
            .withf(|tags, exclude, limit| {
                let expected: BTreeSet<String> = ["oil", "portrait", "sketch"]
                    .into_iter()
                    .map(String::from)
                    .collect();
                *tags == expected && exclude == "alice" && *limit == DEFAULT_SUGGESTION_LIMIT
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![summary("bob")]));

        let engine = SuggestionEngine::new(store);
        let suggestions = engine.get_suggestions("alice").await.unwrap();
        assert_eq!(suggestions, vec![summary("bob")]);
    }

    #[tokio::test]
    async fn test_requester_and_overflow_filtered() {
        let mut store = mock_with_tags(vec!["portrait"], vec![]);
        store.expect_users_engaged_with_tags().returning(|_, _, _| {
            Ok(vec![
                summary("alice"),
                summary("b"),
                summary("c"),
                summary("d"),
                summary("e"),
                summary("f"),
            ])
        });

        let engine = SuggestionEngine::new(store);
        let suggestions = engine.get_suggestions("alice").await.unwrap();
        let ids: Vec<&str> = suggestions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_datastore_failure_propagates() {
        let mut store = MockSocialGraphStore::new();
        store
            .expect_recent_like_tags()
            .times(1)
            .returning(|_, _| Err(Error::DataStoreUnavailable("connection refused".into())));
        store.expect_recent_bookmark_tags().never();
        store.expect_users_engaged_with_tags().never();

        let engine = SuggestionEngine::new(store);
        let err = engine.get_suggestions("alice").await.unwrap_err();
        assert_eq!(err.code(), "datastore_unavailable");
    }

    #[tokio::test]
    async fn test_blank_user_id_rejected() {
        let store = MockSocialGraphStore::new();
        let engine = SuggestionEngine::new(store);
        let err = engine.get_suggestions("  ").await.unwrap_err();
        assert_eq!(err.code(), "invalid_request");
    }

    #[test]
    fn test_config_defaults() {
        let config = SuggestionConfig::default();
        assert_eq!(config.like_window, 10);
        assert_eq!(config.bookmark_window, 10);
        assert_eq!(config.limit, 4);
    }
}
