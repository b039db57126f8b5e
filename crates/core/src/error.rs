//! Core Error Types
//!
//! Failures that cross a function boundary inside the protocol core: building
//! a path guard, confining a path, resolving an operation name, and strict
//! parsing. Per-call tool failures are not represented here; the dispatcher
//! turns them into result strings.

use thiserror::Error;

/// Error type for the Nexus Agent protocol core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The workspace root could not be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resolving the working directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path resolved outside the configured workspace root
    #[error("Path \"{path}\" is out of bounds of the workspace root {root}")]
    OutOfBounds { path: String, root: String },

    /// A tool call named an operation outside the closed set
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Strict parsing refused the response
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Out-of-bounds error for a candidate path and its root
    pub fn out_of_bounds(path: impl Into<String>, root: impl Into<String>) -> Self {
        Self::OutOfBounds {
            path: path.into(),
            root: root.into(),
        }
    }

    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether this error is a sandbox violation
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
