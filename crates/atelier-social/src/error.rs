//! Error types for atelier-social

use thiserror::Error;

/// Social graph error type
#[derive(Debug, Error)]
pub enum Error {
    /// The datastore could not be reached
    #[error("datastore unavailable: {0}")]
    DataStoreUnavailable(String),

    /// A query or statement failed
    #[error("database error: {0}")]
    Database(String),

    /// Entity not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Request rejected before touching the datastore
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Entity already exists
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data could not be decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a not found error
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid request error
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a conflict error
    #[must_use]
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DataStoreUnavailable(_) => "datastore_unavailable",
            Self::Database(_) => "database_error",
            Self::NotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Conflict(_) => "conflict",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => Self::DataStoreUnavailable(err.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
