//! Operation Names
//!
//! The closed set of operations a tool call may name. Adding an operation
//! means adding one variant here, one parameter variant in `params`, and one
//! handler arm in the dispatcher; the compiler points at every other place
//! that needs to change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Every operation the agent knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationName {
    ReadFile,
    WriteFile,
    ListFile,
    DeleteFile,
    CopyFile,
    MoveFile,
    CreateDirectory,
    DeleteDirectory,
    GetFileInfo,
    AppendFile,
    InsertFileContent,
    ReplaceFileContent,
    GetSystemInfo,
    GetEnvVariable,
    SetEnvVariable,
    SearchWeb,
    RunCommand,
}

/// Broad grouping used for logging and documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    File,
    Content,
    System,
    Web,
    Command,
}

/// How much damage a misbehaving call of this operation can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Read-only
    Safe,
    Medium,
    High,
}

impl OperationName {
    /// All operations in declaration order.
    pub const ALL: [OperationName; 17] = [
        Self::ReadFile,
        Self::WriteFile,
        Self::ListFile,
        Self::DeleteFile,
        Self::CopyFile,
        Self::MoveFile,
        Self::CreateDirectory,
        Self::DeleteDirectory,
        Self::GetFileInfo,
        Self::AppendFile,
        Self::InsertFileContent,
        Self::ReplaceFileContent,
        Self::GetSystemInfo,
        Self::GetEnvVariable,
        Self::SetEnvVariable,
        Self::SearchWeb,
        Self::RunCommand,
    ];

    /// Wire name as it appears in a `<tools>` body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadFile => "read_file",
            Self::WriteFile => "write_file",
            Self::ListFile => "list_file",
            Self::DeleteFile => "delete_file",
            Self::CopyFile => "copy_file",
            Self::MoveFile => "move_file",
            Self::CreateDirectory => "create_directory",
            Self::DeleteDirectory => "delete_directory",
            Self::GetFileInfo => "get_file_info",
            Self::AppendFile => "append_file",
            Self::InsertFileContent => "insert_file_content",
            Self::ReplaceFileContent => "replace_file_content",
            Self::GetSystemInfo => "get_system_info",
            Self::GetEnvVariable => "get_env_variable",
            Self::SetEnvVariable => "set_env_variable",
            Self::SearchWeb => "search_web",
            Self::RunCommand => "run_command",
        }
    }

    pub fn category(&self) -> OperationCategory {
        match self {
            Self::ReadFile
            | Self::WriteFile
            | Self::ListFile
            | Self::DeleteFile
            | Self::CopyFile
            | Self::MoveFile
            | Self::CreateDirectory
            | Self::DeleteDirectory
            | Self::GetFileInfo => OperationCategory::File,
            Self::AppendFile | Self::InsertFileContent | Self::ReplaceFileContent => {
                OperationCategory::Content
            }
            Self::GetSystemInfo | Self::GetEnvVariable | Self::SetEnvVariable => {
                OperationCategory::System
            }
            Self::SearchWeb => OperationCategory::Web,
            Self::RunCommand => OperationCategory::Command,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::WriteFile
            | Self::DeleteFile
            | Self::DeleteDirectory
            | Self::ReplaceFileContent
            | Self::RunCommand
            | Self::SetEnvVariable => RiskLevel::High,
            Self::CopyFile | Self::MoveFile | Self::AppendFile | Self::InsertFileContent => {
                RiskLevel::Medium
            }
            Self::ReadFile
            | Self::ListFile
            | Self::CreateDirectory
            | Self::GetFileInfo
            | Self::GetSystemInfo
            | Self::GetEnvVariable
            | Self::SearchWeb => RiskLevel::Safe,
        }
    }

    /// Parameter keys that must be present for this operation.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::ReadFile | Self::DeleteFile | Self::GetFileInfo => &["filePath"],
            Self::WriteFile | Self::AppendFile => &["filePath", "content"],
            Self::ListFile => &["workspacePath"],
            Self::CopyFile | Self::MoveFile => &["sourcePath", "targetPath"],
            Self::CreateDirectory | Self::DeleteDirectory => &["dirPath"],
            Self::InsertFileContent => &["filePath", "position", "content"],
            Self::ReplaceFileContent => &["filePath", "oldContent", "newContent"],
            Self::GetSystemInfo => &[],
            Self::GetEnvVariable => &["name"],
            Self::SetEnvVariable => &["name", "value"],
            Self::SearchWeb => &["query"],
            Self::RunCommand => &["command"],
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CoreError::unknown_operation(s))
    }
}
