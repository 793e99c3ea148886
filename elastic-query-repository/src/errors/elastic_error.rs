//! Top-level error type for connections and query builders.

use thiserror::Error;

use super::SearchError;

/// Errors returned by connection resolution and query execution.
#[derive(Error, Debug)]
pub enum ElasticError {
    /// Unknown connection name or unusable connection settings.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An operation was called before the state it depends on exists,
    /// e.g. scrolling before any search opened a cursor.
    #[error("Precondition error: {0}")]
    PreconditionError(String),

    /// Failure reported by the search engine client.
    #[error("Backend error: {0}")]
    BackendError(#[from] SearchError),
}

impl ElasticError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a configuration error for a connection name with no config block.
    pub fn not_configured(name: &str) -> Self {
        Self::ConfigurationError(format!(
            "Elastic configuration for connection [{}] not configured.",
            name
        ))
    }

    /// Create a precondition error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionError(msg.into())
    }
}
