//! Search error types.
//!
//! This module defines the error types that can occur while talking to the
//! search service.

use thiserror::Error;

/// Errors that can occur during search service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Failed to reach the search service, or the client could not be built.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The document, index or scroll cursor does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write conflicts with an existing document.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The service answered with any other non-success status.
    #[error("Remote error (status {status}): {message}")]
    RemoteError { status: u16, message: String },

    /// Failed to parse a response from the search service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a record for the search service.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// No default index is configured for a record type.
    #[error("No default index mapped for record type '{0}'")]
    UnmappedRecordType(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Map a non-success HTTP status from the service to an error.
    pub fn from_status(status: u16, msg: impl Into<String>) -> Self {
        let message = msg.into();
        match status {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::RemoteError { status, message },
        }
    }

    /// Whether the error reports a missing document, index or cursor.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error reports a write conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
