//! Canvas Session Management
//!
//! This module provides session management for paint canvases.
//! Each session owns one compositor behind its own lock; commands for a
//! session never interleave, while separate sessions proceed independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::compositor::{CanvasSettings, CanvasSnapshot, Compositor};
use crate::error::{Error, Result};
use crate::export::CompositeImage;
use crate::protocol::{CanvasCommand, CanvasUpdate};

/// A canvas session representing an active painting context
#[derive(Debug, Clone)]
pub struct CanvasSession {
    /// Unique session identifier
    pub id: Uuid,

    /// User who owns this session
    pub user_id: String,

    /// The paint surface
    pub compositor: Compositor,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session was last accessed
    pub last_accessed_at: DateTime<Utc>,
}

impl CanvasSession {
    /// Create a new session around a compositor
    #[must_use]
    pub fn new(user_id: impl Into<String>, compositor: Compositor) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            compositor,
            created_at: now,
            last_accessed_at: now,
        }
    }

    /// Update last accessed timestamp
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    /// Check if session is expired (not accessed for given duration)
    #[must_use]
    pub fn is_expired(&self, max_idle_secs: i64) -> bool {
        let idle_duration = Utc::now() - self.last_accessed_at;
        idle_duration.num_seconds() > max_idle_secs
    }

    /// Serializable view of the session
    #[must_use]
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            last_accessed_at: self.last_accessed_at,
            state: self.compositor.snapshot(),
        }
    }
}

/// Serializable summary of a canvas session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session ID
    pub id: Uuid,
    /// Owner
    pub user_id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session was last accessed
    pub last_accessed_at: DateTime<Utc>,
    /// Compositor state
    pub state: CanvasSnapshot,
}

type SharedSession = Arc<Mutex<CanvasSession>>;

/// Session manager for handling multiple canvas sessions
pub struct CanvasSessionManager {
    /// Active sessions by ID, each behind its own lock
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,

    /// Sessions by user ID for quick lookup
    user_sessions: Arc<RwLock<HashMap<String, Vec<Uuid>>>>,

    /// Settings for new compositors
    default_settings: CanvasSettings,

    /// Maximum idle time before session expires (in seconds)
    max_idle_secs: i64,

    /// Maximum sessions per user
    max_sessions_per_user: usize,
}

impl CanvasSessionManager {
    /// Create a new session manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            user_sessions: Arc::new(RwLock::new(HashMap::new())),
            default_settings: CanvasSettings::default(),
            max_idle_secs: 3600, // 1 hour default
            max_sessions_per_user: 10,
        }
    }

    /// Configure settings for new compositors
    #[must_use]
    pub fn with_default_settings(mut self, settings: CanvasSettings) -> Self {
        self.default_settings = settings;
        self
    }

    /// Configure maximum idle time
    #[must_use]
    pub fn with_max_idle_secs(mut self, secs: i64) -> Self {
        self.max_idle_secs = secs;
        self
    }

    /// Configure maximum sessions per user
    #[must_use]
    pub fn with_max_sessions_per_user(mut self, max: usize) -> Self {
        self.max_sessions_per_user = max;
        self
    }

    /// Settings applied to new compositors
    #[must_use]
    pub fn default_settings(&self) -> CanvasSettings {
        self.default_settings
    }

    /// Handle to one session; the map lock is released before it is used
    async fn handle(&self, session_id: Uuid) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.get(&session_id).cloned()
    }

    /// Create a new session
    ///
    /// `size` overrides the default canvas dimensions.
    pub async fn create_session(
        &self,
        user_id: impl Into<String>,
        size: Option<(u32, u32)>,
    ) -> Result<SessionInfo> {
        let mut settings = self.default_settings;
        if let Some((width, height)) = size {
            settings.width = width;
            settings.height = height;
        }
        let compositor = Compositor::with_settings(settings)?;

        let user_id = user_id.into();
        let session = CanvasSession::new(&user_id, compositor);
        let session_id = session.id;
        let info = session.info();

        // Add to sessions
        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session_id, Arc::new(Mutex::new(session)));
        }

        // Track user session
        {
            let mut user_sessions = self.user_sessions.write().await;
            let sessions = user_sessions.entry(user_id.clone()).or_default();
            sessions.push(session_id);

            // Limit sessions per user
            if sessions.len() > self.max_sessions_per_user {
                // Remove oldest sessions
                let to_remove: Vec<_> = sessions
                    .drain(0..sessions.len() - self.max_sessions_per_user)
                    .collect();

                drop(user_sessions);

                // Remove from main session store
                let mut all_sessions = self.sessions.write().await;
                for id in to_remove {
                    all_sessions.remove(&id);
                }
            }
        }

        info!(session_id = %session_id, user_id = %user_id, "Canvas session created");
        Ok(info)
    }

    /// Get a session summary by ID
    pub async fn get_session(&self, session_id: Uuid) -> Option<SessionInfo> {
        let session = self.handle(session_id).await?;
        let session = session.lock().await;
        Some(session.info())
    }

    /// Run `f` against a session under that session's lock
    ///
    /// Commands for one session run in order; other sessions are not blocked.
    pub async fn update_session<F, R>(&self, session_id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut CanvasSession) -> R,
    {
        let session = self.handle(session_id).await?;
        let mut session = session.lock().await;
        session.touch();
        Some(f(&mut *session))
    }

    /// Apply a command to a session's compositor
    pub async fn apply(&self, session_id: Uuid, command: CanvasCommand) -> Result<CanvasUpdate> {
        let pointer = command.is_pointer_event();
        let update = self
            .update_session(session_id, |session| session.compositor.apply(command))
            .await
            .ok_or(Error::SessionNotFound(session_id))??;

        if !pointer {
            debug!(session_id = %session_id, update = ?update, "Canvas command applied");
        }
        Ok(update)
    }

    /// Export the current composite of a session
    pub async fn export(&self, session_id: Uuid) -> Result<CompositeImage> {
        let session = self
            .handle(session_id)
            .await
            .ok_or(Error::SessionNotFound(session_id))?;
        let session = session.lock().await;
        session.compositor.composite()
    }

    /// Get all sessions for a user
    pub async fn get_user_sessions(&self, user_id: &str) -> Vec<SessionInfo> {
        let session_ids = {
            let user_sessions = self.user_sessions.read().await;
            user_sessions.get(user_id).cloned().unwrap_or_default()
        };

        let mut infos = Vec::with_capacity(session_ids.len());
        for id in session_ids {
            if let Some(info) = self.get_session(id).await {
                infos.push(info);
            }
        }
        infos
    }

    /// Remove a session
    pub async fn remove_session(&self, session_id: Uuid) -> Option<SessionInfo> {
        let session = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&session_id)
        }?;
        let info = session.lock().await.info();

        let mut user_sessions = self.user_sessions.write().await;
        if let Some(sessions) = user_sessions.get_mut(&info.user_id) {
            sessions.retain(|&id| id != session_id);
            if sessions.is_empty() {
                user_sessions.remove(&info.user_id);
            }
        }

        Some(info)
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> usize {
        let handles: Vec<(Uuid, SharedSession)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, session)| (*id, session.clone()))
                .collect()
        };

        let mut count = 0;
        for (id, session) in handles {
            let expired = session.lock().await.is_expired(self.max_idle_secs);
            if expired && self.remove_session(id).await.is_some() {
                count += 1;
            }
        }

        if count > 0 {
            info!(count, "Expired canvas sessions removed");
        }
        count
    }

    /// Get total number of active sessions
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

impl Default for CanvasSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Point;

    fn small_manager() -> CanvasSessionManager {
        CanvasSessionManager::new().with_default_settings(CanvasSettings {
            width: 32,
            height: 24,
            ..CanvasSettings::default()
        })
    }

    #[test]
    fn test_canvas_session_expiry() {
        let mut session = CanvasSession::new("user1", Compositor::new());

        // Fresh session should not be expired
        assert!(!session.is_expired(3600));

        // Manually set last_accessed_at to the past
        session.last_accessed_at = Utc::now() - chrono::Duration::seconds(7200);
        assert!(session.is_expired(3600));
    }

    #[test]
    fn test_create_session_blocking() {
        let manager = small_manager();
        let info = tokio_test::block_on(manager.create_session("user1", None)).unwrap();
        assert_eq!(info.user_id, "user1");
        assert_eq!((info.state.width, info.state.height), (32, 24));
        assert_eq!(info.state.layer_count, 1);
    }

    #[tokio::test]
    async fn test_create_session_with_size() {
        let manager = small_manager();
        let info = manager.create_session("user1", Some((64, 48))).await.unwrap();
        assert_eq!((info.state.width, info.state.height), (64, 48));

        let err = manager.create_session("user1", Some((0, 48))).await.unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        assert_eq!(manager.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_apply_commands() {
        let manager = small_manager();
        let info = manager.create_session("user1", None).await.unwrap();

        manager
            .apply(
                info.id,
                CanvasCommand::BeginStroke {
                    point: Point::new(4.0, 4.0),
                },
            )
            .await
            .unwrap();
        let update = manager.apply(info.id, CanvasCommand::EndStroke).await.unwrap();
        assert!(matches!(update, CanvasUpdate::Exported { .. }));

        let exported = manager.export(info.id).await.unwrap();
        assert_eq!(exported.decode().unwrap().get_pixel(4, 4)[3], 255);
    }

    #[tokio::test]
    async fn test_apply_unknown_session() {
        let manager = small_manager();
        let err = manager
            .apply(Uuid::new_v4(), CanvasCommand::AddLayer)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "session_not_found");
        assert!(manager.export(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_apply_surfaces_compositor_errors() {
        let manager = small_manager();
        let info = manager.create_session("user1", None).await.unwrap();
        manager.apply(info.id, CanvasCommand::DeleteLayer).await.unwrap();

        let err = manager
            .apply(info.id, CanvasCommand::DeleteLayer)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_state");
    }

    #[tokio::test]
    async fn test_session_manager_remove_session() {
        let manager = small_manager();
        let info = manager.create_session("user1", None).await.unwrap();

        assert_eq!(manager.session_count().await, 1);
        assert!(manager.remove_session(info.id).await.is_some());
        assert_eq!(manager.session_count().await, 0);
        assert!(manager.get_user_sessions("user1").await.is_empty());
    }

    #[tokio::test]
    async fn test_session_manager_max_sessions_per_user() {
        let manager = small_manager().with_max_sessions_per_user(2);

        let s1 = manager.create_session("user1", None).await.unwrap();
        manager.create_session("user1", None).await.unwrap();
        manager.create_session("user1", None).await.unwrap();
        manager.create_session("user2", None).await.unwrap();

        assert_eq!(manager.get_user_sessions("user1").await.len(), 2);
        assert_eq!(manager.get_user_sessions("user2").await.len(), 1);

        // First session should have been removed
        assert!(manager.get_session(s1.id).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let manager = small_manager().with_max_idle_secs(60);
        let info = manager.create_session("user1", None).await.unwrap();
        manager
            .update_session(info.id, |s| {
                s.last_accessed_at = Utc::now() - chrono::Duration::seconds(120);
            })
            .await;

        // update_session touches before running the closure
        assert_eq!(manager.cleanup_expired().await, 1);
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_removed_users_are_not_tracked() {
        let manager = small_manager().with_max_idle_secs(60);
        let first = manager.create_session("user1", None).await.unwrap();
        let second = manager.create_session("user2", None).await.unwrap();

        manager.remove_session(first.id).await.unwrap();
        assert!(!manager.user_sessions.read().await.contains_key("user1"));

        manager
            .update_session(second.id, |s| {
                s.last_accessed_at = Utc::now() - chrono::Duration::seconds(120);
            })
            .await;
        assert_eq!(manager.cleanup_expired().await, 1);
        assert!(manager.user_sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_busy_session_does_not_block_others() {
        let manager = small_manager();
        let busy = manager.create_session("user1", None).await.unwrap();
        let other = manager.create_session("user2", None).await.unwrap();

        let handle = manager.handle(busy.id).await.unwrap();
        let _guard = handle.lock().await;

        let update = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            manager.apply(other.id, CanvasCommand::AddLayer),
        )
        .await
        .expect("other session blocked by a busy one")
        .unwrap();
        assert!(matches!(update, CanvasUpdate::LayerAdded { index: 1 }));
        assert_eq!(manager.session_count().await, 2);
    }
}
