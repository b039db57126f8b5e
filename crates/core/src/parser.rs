//! Streaming Response Parser
//!
//! Extracts the five sections of an agent response (`user_task`, `thinking`,
//! `tools`, `tools_result`, `final_answer`) one character at a time.
//!
//! The machine is deliberately flat: there is a single current section and no
//! tag stack. An opening tag for one section while inside another simply
//! switches sections, and any closing tag returns to `None`. Nested or
//! overlapping sections therefore have no defined meaning. `ParserMode::Strict`
//! refuses those transitions instead of following them and records each one as
//! a `NestingViolation`.
//!
//! Anything between `<` and `>` that is not a known tag is dropped, and the
//! current section is left as it was. This also swallows a bare `<` in prose up
//! to the next `>`.

use std::fmt;

use serde_json::Value;

use crate::call::{ParsedResponse, ToolCall};
use crate::error::{CoreError, CoreResult};

const USER_TASK_TAG: &str = "user_task";
const THINKING_TAG: &str = "thinking";
const TOOLS_TAG: &str = "tools";
const TOOLS_RESULT_TAG: &str = "tools_result";
const FINAL_ANSWER_TAG: &str = "final_answer";

/// Which section the parser is currently accumulating into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    None,
    UserTask,
    Thinking,
    Tools,
    ToolsResult,
    FinalAnswer,
}

impl ParseState {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            USER_TASK_TAG => Some(Self::UserTask),
            THINKING_TAG => Some(Self::Thinking),
            TOOLS_TAG => Some(Self::Tools),
            TOOLS_RESULT_TAG => Some(Self::ToolsResult),
            FINAL_ANSWER_TAG => Some(Self::FinalAnswer),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::UserTask => USER_TASK_TAG,
            Self::Thinking => THINKING_TAG,
            Self::Tools => TOOLS_TAG,
            Self::ToolsResult => TOOLS_RESULT_TAG,
            Self::FinalAnswer => FINAL_ANSWER_TAG,
        }
    }
}

/// How the parser treats overlapping sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserMode {
    /// Follow every tag, switching sections as they appear.
    #[default]
    Lenient,
    /// Ignore and record tags that would nest or mismatch sections.
    Strict,
}

/// A tag that strict mode refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingViolation {
    /// Tag name as written, e.g. `thinking` or `/tools`.
    pub tag: String,
    /// Section that was open when the tag appeared.
    pub open: ParseState,
    /// Character offset of the closing `>`.
    pub offset: usize,
}

impl fmt::Display for NestingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}> at offset {} while inside <{}>",
            self.tag,
            self.offset,
            self.open.tag()
        )
    }
}

/// Character-at-a-time section parser.
///
/// Feeding a string whole or in arbitrary chunks gives identical results.
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    mode: ParserMode,
    state: ParseState,
    response: ParsedResponse,
    tools_buffer: String,
    in_tag: bool,
    tag_name: String,
    offset: usize,
    violations: Vec<NestingViolation>,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ParserMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ParserMode {
        self.mode
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Tags refused so far (always empty in lenient mode).
    pub fn violations(&self) -> &[NestingViolation] {
        &self.violations
    }

    /// Process one character.
    pub fn feed_char(&mut self, c: char) {
        self.offset += 1;

        if c == '<' && !self.in_tag {
            self.in_tag = true;
            self.tag_name.clear();
            return;
        }

        if c == '>' && self.in_tag {
            self.in_tag = false;
            self.handle_tag();
            return;
        }

        if self.in_tag {
            self.tag_name.push(c);
            return;
        }

        match self.state {
            ParseState::None => {}
            ParseState::UserTask => self.response.user_task.push(c),
            ParseState::Thinking => self.response.thinking.push(c),
            ParseState::Tools => self.tools_buffer.push(c),
            ParseState::ToolsResult => self.response.tools_result.push(c),
            ParseState::FinalAnswer => self.response.final_answer.push(c),
        }
    }

    /// Process every character of `chunk`.
    pub fn feed(&mut self, chunk: &str) {
        for c in chunk.chars() {
            self.feed_char(c);
        }
    }

    /// Return to the initial state, keeping the configured mode.
    pub fn reset(&mut self) {
        *self = Self::with_mode(self.mode);
    }

    /// Copy of everything parsed so far.
    pub fn snapshot(&self) -> ParsedResponse {
        self.response.clone()
    }

    pub fn finish(self) -> ParsedResponse {
        self.response
    }

    fn handle_tag(&mut self) {
        let tag = std::mem::take(&mut self.tag_name);
        if let Some(closing) = tag.strip_prefix('/') {
            if let Some(section) = ParseState::from_tag(closing) {
                self.close_section(section, &tag);
            }
        } else if let Some(section) = ParseState::from_tag(&tag) {
            self.open_section(section, &tag);
        }
    }

    fn open_section(&mut self, section: ParseState, tag: &str) {
        if self.mode == ParserMode::Strict && self.state != ParseState::None {
            self.record_violation(tag);
            return;
        }

        self.state = section;
        match section {
            ParseState::None => {}
            ParseState::UserTask => self.response.user_task.clear(),
            ParseState::Thinking => self.response.thinking.clear(),
            ParseState::Tools => {
                self.response.tools.clear();
                self.tools_buffer.clear();
            }
            ParseState::ToolsResult => self.response.tools_result.clear(),
            ParseState::FinalAnswer => self.response.final_answer.clear(),
        }
    }

    fn close_section(&mut self, section: ParseState, tag: &str) {
        if self.mode == ParserMode::Strict && self.state != section {
            self.record_violation(tag);
            return;
        }

        if section == ParseState::Tools {
            let buffer = std::mem::take(&mut self.tools_buffer);
            match decode_tools(&buffer) {
                Some(tools) => self.response.tools = tools,
                None if buffer.trim().is_empty() => {}
                None => tracing::warn!(
                    "Failed to decode tools JSON ({} bytes), continuing without tool calls",
                    buffer.len()
                ),
            }
        }
        self.state = ParseState::None;
    }

    fn record_violation(&mut self, tag: &str) {
        tracing::debug!("Strict parser refused <{}> inside <{}>", tag, self.state.tag());
        self.violations.push(NestingViolation {
            tag: tag.to_string(),
            open: self.state,
            offset: self.offset,
        });
    }
}

/// Decode a `<tools>` body: one object becomes a single call, an array of
/// objects becomes that many calls. Anything else is rejected.
pub fn decode_tools(body: &str) -> Option<Vec<ToolCall>> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value::<ToolCall>)
            .collect::<Result<Vec<_>, _>>()
            .ok(),
        Value::Object(_) => serde_json::from_value::<ToolCall>(value)
            .ok()
            .map(|call| vec![call]),
        _ => None,
    }
}

/// Remove a wrapping markdown fence (```` ```xml ... ``` ````) if present.
pub fn strip_code_fence(text: &str) -> &str {
    let mut content = text.trim();
    if let Some(rest) = content.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        content = &rest[tag_len..];
    }
    if let Some(rest) = content.trim_end().strip_suffix("```") {
        content = rest;
    }
    content.trim()
}

/// Parse a complete response leniently. `None` when no section captured
/// anything.
pub fn parse_response(text: &str) -> Option<ParsedResponse> {
    parse_response_with_mode(text, ParserMode::Lenient)
        .ok()
        .flatten()
}

/// Parse a complete response in the given mode.
///
/// In strict mode any refused tag turns the whole parse into an error.
pub fn parse_response_with_mode(
    text: &str,
    mode: ParserMode,
) -> CoreResult<Option<ParsedResponse>> {
    let content = strip_code_fence(text);
    tracing::debug!("Parsing response content, {} bytes", content.len());

    let mut parser = ResponseParser::with_mode(mode);
    parser.feed(content);

    if !parser.violations().is_empty() {
        let details: Vec<String> = parser.violations().iter().map(|v| v.to_string()).collect();
        return Err(CoreError::parse(format!(
            "overlapping sections: {}",
            details.join("; ")
        )));
    }

    let response = parser.finish();
    if response.is_empty() {
        tracing::warn!("Response content is empty or has no recognizable sections");
        return Ok(None);
    }

    tracing::debug!(
        "Parsed response: {} tool call(s), final answer {} bytes",
        response.tools.len(),
        response.final_answer.len()
    );
    Ok(Some(response))
}
