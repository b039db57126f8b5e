//! Parameter Shapes
//!
//! A tool call arrives with an untyped JSON bag. `ToolParameters` is the typed
//! form, one variant per operation, and building it is the validation step:
//! a bag that cannot become a `ToolParameters` never reaches a handler.
//!
//! Validation happens in two passes. The shape pass only checks that the
//! required keys are present, so the error can list everything that is missing
//! at once. The extraction pass then coerces values leniently (models are loose
//! about quoting numbers and booleans). Range checks that depend on file
//! contents, such as an insert position, stay with the handlers.

use serde_json::Value;
use thiserror::Error;

use crate::operation::OperationName;

/// Why a parameter bag could not be turned into `ToolParameters`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{operation} parameter error: missing {}", .fields.join(", "))]
    Missing {
        operation: OperationName,
        fields: Vec<&'static str>,
    },

    #[error("{operation} parameter error: `{field}` must be {expected}")]
    InvalidType {
        operation: OperationName,
        field: &'static str,
        expected: &'static str,
    },
}

/// Typed parameters for each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolParameters {
    ReadFile { file_path: String },
    WriteFile { file_path: String, content: String },
    ListFile { workspace_path: String },
    DeleteFile { file_path: String },
    CopyFile { source_path: String, target_path: String },
    MoveFile { source_path: String, target_path: String },
    CreateDirectory { dir_path: String },
    DeleteDirectory { dir_path: String, recursive: bool },
    GetFileInfo { file_path: String },
    AppendFile { file_path: String, content: String },
    /// `position` is signed so a negative offset reaches the handler's range check.
    InsertFileContent { file_path: String, position: i64, content: String },
    ReplaceFileContent { file_path: String, old_content: String, new_content: String },
    GetSystemInfo,
    GetEnvVariable { name: String },
    SetEnvVariable { name: String, value: String },
    SearchWeb { query: String },
    RunCommand { command: String },
}

/// Presence-only check: does `bag` carry every key `operation` requires?
pub fn shape_ok(operation: OperationName, bag: &Value) -> bool {
    missing_fields(operation, bag).is_empty()
}

/// Required keys of `operation` that `bag` lacks. A non-object bag lacks all of them.
pub fn missing_fields(operation: OperationName, bag: &Value) -> Vec<&'static str> {
    operation
        .required_fields()
        .iter()
        .copied()
        .filter(|key| bag.get(key).is_none())
        .collect()
}

impl ToolParameters {
    /// Validate `bag` for `operation` and build the typed parameters.
    pub fn from_bag(operation: OperationName, bag: &Value) -> Result<Self, ShapeError> {
        let missing = missing_fields(operation, bag);
        if !missing.is_empty() {
            return Err(ShapeError::Missing {
                operation,
                fields: missing,
            });
        }

        let fields = Fields { operation, bag };
        let params = match operation {
            OperationName::ReadFile => Self::ReadFile {
                file_path: fields.path("filePath")?,
            },
            OperationName::WriteFile => Self::WriteFile {
                file_path: fields.path("filePath")?,
                content: fields.text("content")?,
            },
            OperationName::ListFile => Self::ListFile {
                workspace_path: fields.path("workspacePath")?,
            },
            OperationName::DeleteFile => Self::DeleteFile {
                file_path: fields.path("filePath")?,
            },
            OperationName::CopyFile => Self::CopyFile {
                source_path: fields.path("sourcePath")?,
                target_path: fields.path("targetPath")?,
            },
            OperationName::MoveFile => Self::MoveFile {
                source_path: fields.path("sourcePath")?,
                target_path: fields.path("targetPath")?,
            },
            OperationName::CreateDirectory => Self::CreateDirectory {
                dir_path: fields.path("dirPath")?,
            },
            OperationName::DeleteDirectory => Self::DeleteDirectory {
                dir_path: fields.path("dirPath")?,
                recursive: fields.flag("recursive")?,
            },
            OperationName::GetFileInfo => Self::GetFileInfo {
                file_path: fields.path("filePath")?,
            },
            OperationName::AppendFile => Self::AppendFile {
                file_path: fields.path("filePath")?,
                content: fields.text("content")?,
            },
            OperationName::InsertFileContent => Self::InsertFileContent {
                file_path: fields.path("filePath")?,
                position: fields.integer("position")?,
                content: fields.text("content")?,
            },
            OperationName::ReplaceFileContent => Self::ReplaceFileContent {
                file_path: fields.path("filePath")?,
                old_content: fields.text("oldContent")?,
                new_content: fields.text("newContent")?,
            },
            OperationName::GetSystemInfo => Self::GetSystemInfo,
            OperationName::GetEnvVariable => Self::GetEnvVariable {
                name: fields.path("name")?,
            },
            OperationName::SetEnvVariable => Self::SetEnvVariable {
                name: fields.path("name")?,
                value: fields.text("value")?,
            },
            OperationName::SearchWeb => Self::SearchWeb {
                query: fields.text("query")?,
            },
            OperationName::RunCommand => Self::RunCommand {
                command: fields.path("command")?,
            },
        };
        Ok(params)
    }

    /// The operation these parameters belong to.
    pub fn operation(&self) -> OperationName {
        match self {
            Self::ReadFile { .. } => OperationName::ReadFile,
            Self::WriteFile { .. } => OperationName::WriteFile,
            Self::ListFile { .. } => OperationName::ListFile,
            Self::DeleteFile { .. } => OperationName::DeleteFile,
            Self::CopyFile { .. } => OperationName::CopyFile,
            Self::MoveFile { .. } => OperationName::MoveFile,
            Self::CreateDirectory { .. } => OperationName::CreateDirectory,
            Self::DeleteDirectory { .. } => OperationName::DeleteDirectory,
            Self::GetFileInfo { .. } => OperationName::GetFileInfo,
            Self::AppendFile { .. } => OperationName::AppendFile,
            Self::InsertFileContent { .. } => OperationName::InsertFileContent,
            Self::ReplaceFileContent { .. } => OperationName::ReplaceFileContent,
            Self::GetSystemInfo => OperationName::GetSystemInfo,
            Self::GetEnvVariable { .. } => OperationName::GetEnvVariable,
            Self::SetEnvVariable { .. } => OperationName::SetEnvVariable,
            Self::SearchWeb { .. } => OperationName::SearchWeb,
            Self::RunCommand { .. } => OperationName::RunCommand,
        }
    }
}

/// Field extraction over a bag already known to contain the required keys.
struct Fields<'a> {
    operation: OperationName,
    bag: &'a Value,
}

impl Fields<'_> {
    fn invalid(&self, field: &'static str, expected: &'static str) -> ShapeError {
        ShapeError::InvalidType {
            operation: self.operation,
            field,
            expected,
        }
    }

    /// Paths, names and commands: strings only.
    fn path(&self, key: &'static str) -> Result<String, ShapeError> {
        match self.bag.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(self.invalid(key, "a string")),
        }
    }

    /// Free text: strings, plus numbers and booleans rendered as text.
    fn text(&self, key: &'static str) -> Result<String, ShapeError> {
        match self.bag.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            _ => Err(self.invalid(key, "a string")),
        }
    }

    fn integer(&self, key: &'static str) -> Result<i64, ShapeError> {
        let value = match self.bag.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        value.ok_or_else(|| self.invalid(key, "an integer"))
    }

    /// Optional boolean, absent or null meaning false.
    fn flag(&self, key: &'static str) -> Result<bool, ShapeError> {
        match self.bag.get(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(self.invalid(key, "a boolean")),
        }
    }
}
