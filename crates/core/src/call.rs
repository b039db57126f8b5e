//! Tool Call Data Model
//!
//! `ToolCall` is what the parser decodes out of a `<tools>` section,
//! `ToolResult` is what the dispatcher hands back, and `ParsedResponse` is the
//! full set of sections extracted from one model response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single requested operation.
///
/// `name` is kept as the raw string so that an unknown operation can still be
/// answered with a result carrying the caller's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Caller-supplied correlation token. Not required to be unique.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Untyped parameter bag, validated per operation at dispatch time.
    #[serde(default = "empty_parameters")]
    pub parameters: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parameters: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parameters,
        }
    }
}

fn empty_parameters() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Models emit ids as either strings or bare numbers; accept both.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "tool call id must be a string or number, got {}",
            other
        ))),
    }
}

/// The outcome of one tool call, keyed by the call's id.
///
/// `result` is always human-readable text aimed at the model, never a
/// structured error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub id: String,
    pub result: String,
}

impl ToolResult {
    pub fn new(id: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            result: result.into(),
        }
    }
}

/// All sections extracted from one response. Absent sections stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub user_task: String,
    pub thinking: String,
    pub tools: Vec<ToolCall>,
    pub tools_result: String,
    pub final_answer: String,
}

impl ParsedResponse {
    /// True when no section captured anything.
    pub fn is_empty(&self) -> bool {
        self.user_task.is_empty()
            && self.thinking.is_empty()
            && self.tools.is_empty()
            && self.tools_result.is_empty()
            && self.final_answer.is_empty()
    }
}
