//! Response Types
//!
//! Envelopes printed by the binary and returned to embedding callers.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use nexus_agent_core::{OperationName, ToolResult};

/// Generic `{success, data, error}` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Payload of a processed response: one result per tool call, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessData {
    pub result: Vec<ToolResult>,
    /// RFC 3339 completion time
    pub timestamp: String,
}

impl ProcessData {
    pub fn now(result: Vec<ToolResult>) -> Self {
        Self {
            result,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub type ProcessResponse = CommandResponse<ProcessData>;

/// What the agent is configured to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub workspace_root: PathBuf,
    pub supported_tools: Vec<OperationName>,
    pub disabled_operations: Vec<OperationName>,
    /// Enabled operations rated `RiskLevel::High`
    pub high_risk_operations: Vec<OperationName>,
    pub version: String,
}
