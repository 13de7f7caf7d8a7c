//! Storage errors.

use thiserror::Error;

use lyceum_protocols::LogError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<tokio_rusqlite::Error> for StoreError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, message))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(message.unwrap_or_else(|| e.to_string()))
            }
            tokio_rusqlite::Error::ConnectionClosed => {
                StoreError::Connection("connection closed".to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<StoreError> for LogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(m) => LogError::Serialization(m),
            StoreError::NotFound(m) => LogError::NotFound(m),
            other => LogError::Storage(other.to_string()),
        }
    }
}
