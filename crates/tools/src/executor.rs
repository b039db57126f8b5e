//! Tool Outcome
//!
//! What a handler produces before the dispatcher pairs it with a call id.

use serde::{Deserialize, Serialize};

use nexus_agent_core::OperationName;

/// Result of a single handler execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Whether the execution was successful
    pub success: bool,
    /// Output from the handler (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    /// Create a failed outcome
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }

    /// `"<op> succeeded: <detail>"`
    pub fn succeeded(operation: OperationName, detail: impl std::fmt::Display) -> Self {
        Self::ok(format!("{} succeeded: {}", operation, detail))
    }

    /// `"<op> failed: <cause>"`
    pub fn failed(operation: OperationName, cause: impl std::fmt::Display) -> Self {
        Self::err(format!("{} failed: {}", operation, cause))
    }

    /// Convert to the result string handed back to the model.
    ///
    /// Failure messages already name the operation, so they pass through as-is.
    pub fn to_content(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            self.error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string())
        }
    }
}
