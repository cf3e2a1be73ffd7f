//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout the employee tracker.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database unreachable or connectivity probe failed (fatal)
//! - `QueryFailed`: A statement was rejected by the database (recoverable)
//! - `InvalidInput`: Input rejected client-side, e.g. a cyclic manager chain (recoverable)
//! - `ConfigError`: Missing or malformed environment configuration (fatal)
//! - `PromptFailed`: The terminal could not be read (fatal)

use thiserror::Error;

/// Main error type for employee tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Invalid input rejected before reaching the database
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (missing variable, malformed port, etc.)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Interactive prompt could not be completed
    #[error("Prompt failed: {0}")]
    PromptFailed(String),
}

impl TrackerError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::PromptFailed(_) => "PROMPT_FAILED",
        }
    }

    /// Whether the menu loop may report this error and return to the top menu
    ///
    /// Only errors raised while running a single action qualify. Losing the
    /// terminal or the connection ends the session.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::QueryFailed(_) | Self::InvalidInput(_))
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a prompt error
    pub fn prompt_failed(message: impl Into<String>) -> Self {
        Self::PromptFailed(message.into())
    }
}

impl From<dialoguer::Error> for TrackerError {
    fn from(err: dialoguer::Error) -> Self {
        Self::prompt_failed(err.to_string())
    }
}

/// Result type alias for employee tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
