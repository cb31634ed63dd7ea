//! Error types for atelier-canvas
//!
//! This module provides error types for the canvas system,
//! including compositor state, encoding, session and storage errors.

use thiserror::Error;
use uuid::Uuid;

/// Canvas error type
#[derive(Debug, Error)]
pub enum Error {
    /// Operation not valid for the current compositor state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Argument rejected before any buffer was touched
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// Painting not found
    #[error("painting not found: {0}")]
    PaintingNotFound(String),

    /// Raster encoding error
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid message format
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// WebSocket error
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an invalid state error
    #[must_use]
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid message error
    #[must_use]
    pub fn invalid_message(msg: impl Into<String>) -> Self {
        Self::InvalidMessage(msg.into())
    }

    /// Create a database error
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Check if the caller can fix the request and try again
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidState(_)
                | Self::InvalidArgument(_)
                | Self::InvalidMessage(_)
                | Self::WebSocket(_)
        )
    }

    /// Get error code for protocol messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidState(_) => "invalid_state",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::SessionNotFound(_) => "session_not_found",
            Self::PaintingNotFound(_) => "painting_not_found",
            Self::Encoding(_) => "encoding_error",
            Self::InvalidMessage(_) => "invalid_message",
            Self::WebSocket(_) => "websocket_error",
            Self::Database(_) => "database_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<axum::Error> for Error {
    fn from(err: axum::Error) -> Self {
        Self::WebSocket(err.to_string())
    }
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::invalid_state("no active layer");
        assert_eq!(err.code(), "invalid_state");

        let err = Error::SessionNotFound(Uuid::nil());
        assert_eq!(err.code(), "session_not_found");
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::invalid_argument("width must be positive").is_recoverable());
        assert!(Error::invalid_state("stroke in progress").is_recoverable());
        assert!(!Error::database("disk full").is_recoverable());
        assert!(!Error::SessionNotFound(Uuid::nil()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid_state("no layers to delete");
        assert_eq!(err.to_string(), "invalid state: no layers to delete");
    }

    #[test]
    fn test_from_serde_error() {
        let result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        let err: Error = result.unwrap_err().into();
        assert_eq!(err.code(), "serialization_error");
    }
}
