//! Error types for the health service.
//!
//! Probe failures never leave [`crate::health::HealthAggregator::check`]; they are
//! carried as [`DatastoreError`] values and rendered into the result details.
//! [`TaskerHealthError`] covers everything around the check itself: loading
//! configuration, building the datastore, serializing reports.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskerHealthError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<config::ConfigError> for TaskerHealthError {
    fn from(error: config::ConfigError) -> Self {
        TaskerHealthError::ConfigurationError(error.to_string())
    }
}

impl From<serde_json::Error> for TaskerHealthError {
    fn from(error: serde_json::Error) -> Self {
        TaskerHealthError::SerializationError(format!("JSON serialization error: {error}"))
    }
}

impl From<sqlx::Error> for TaskerHealthError {
    fn from(error: sqlx::Error) -> Self {
        TaskerHealthError::DatabaseError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskerHealthError>;

/// Failure raised while acquiring or validating a datastore connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatastoreError {
    #[error("failed to acquire connection: {0}")]
    Acquire(String),
    #[error("connection validation failed: {0}")]
    Validation(String),
    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("connection reported invalid by datastore")]
    InvalidConnection,
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl DatastoreError {
    /// Short failure category, stable across messages.
    pub fn category(&self) -> &'static str {
        match self {
            DatastoreError::Acquire(_) => "AcquireError",
            DatastoreError::Validation(_) => "ValidationError",
            DatastoreError::Timeout { .. } => "TimeoutError",
            DatastoreError::InvalidConnection => "InvalidConnection",
            DatastoreError::Unexpected(_) => "UnexpectedError",
        }
    }

    /// Human-readable classification: `"<category>: <message>"`.
    pub fn classification(&self) -> String {
        format!("{}: {}", self.category(), self)
    }
}

impl From<sqlx::Error> for DatastoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => DatastoreError::Acquire("pool timed out".to_string()),
            sqlx::Error::PoolClosed => DatastoreError::Acquire("pool closed".to_string()),
            sqlx::Error::Io(e) => DatastoreError::Acquire(e.to_string()),
            sqlx::Error::Tls(e) => DatastoreError::Acquire(format!("tls: {e}")),
            sqlx::Error::Configuration(e) => DatastoreError::Acquire(format!("configuration: {e}")),
            other => DatastoreError::Validation(other.to_string()),
        }
    }
}
