//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.
//!
//! Per-call tool failures are not errors at this level; they come back as
//! result strings. `AppError` covers configuration and the top-level parse
//! failure of a whole response.

use thiserror::Error;

use nexus_agent_core::CoreError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response text contained nothing the parser could attribute
    #[error("Parse error: {0}")]
    Parse(String),

    /// Errors raised by the protocol core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for the "nothing to process" failure of a whole response.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Core(CoreError::Parse(_)))
    }
}

/// Convert AppError to a string suitable for response envelopes
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
