//! Parser Integration Tests
//!
//! Section extraction from complete and streamed responses.

use nexus_agent::nexus_agent_core::{
    parse_response, parse_response_with_mode, ParseState, ParserMode, ResponseParser, ToolCall,
};
use serde_json::json;

const FULL_RESPONSE: &str = r#"<user_task>What is in notes.txt?</user_task>
<thinking>I should read the file first.</thinking>
<tools>[{"id":"1","name":"read_file","parameters":{"filePath":"notes.txt"}}]</tools>
<final_answer>Reading it now.</final_answer>"#;

#[test]
fn test_full_response_sections() {
    let parsed = parse_response(FULL_RESPONSE).unwrap();
    assert_eq!(parsed.user_task, "What is in notes.txt?");
    assert_eq!(parsed.thinking, "I should read the file first.");
    assert_eq!(parsed.final_answer, "Reading it now.");
    assert_eq!(
        parsed.tools,
        vec![ToolCall::new("1", "read_file", json!({ "filePath": "notes.txt" }))]
    );
}

#[test]
fn test_streamed_chunks_match_whole_parse() {
    let whole = parse_response(FULL_RESPONSE).unwrap();

    // Split in awkward places, including inside tag names.
    let mut parser = ResponseParser::new();
    let chars: Vec<char> = FULL_RESPONSE.chars().collect();
    for chunk in chars.chunks(7) {
        parser.feed(&chunk.iter().collect::<String>());
    }
    assert_eq!(parser.state(), ParseState::None);
    assert_eq!(parser.finish(), whole);
}

#[test]
fn test_snapshot_mid_stream() {
    let mut parser = ResponseParser::new();
    parser.feed("<thinking>half a tho");
    assert_eq!(parser.state(), ParseState::Thinking);
    assert_eq!(parser.snapshot().thinking, "half a tho");

    parser.feed("ught</thinking>");
    assert_eq!(parser.snapshot().thinking, "half a thought");
}

#[test]
fn test_unknown_tags_are_dropped() {
    let parsed =
        parse_response("<thinking>keep <b>this</b> text</thinking><other>x</other>").unwrap();
    assert_eq!(parsed.thinking, "keep this text");
    assert!(parsed.final_answer.is_empty());
}

#[test]
fn test_reset_is_idempotent() {
    let mut parser = ResponseParser::with_mode(ParserMode::Strict);
    parser.feed("<final_answer>partial");
    parser.reset();
    let once = parser.snapshot();
    parser.reset();
    assert_eq!(parser.snapshot(), once);
    assert!(once.is_empty());
    assert_eq!(parser.state(), ParseState::None);
    assert_eq!(parser.mode(), ParserMode::Strict);
}

#[test]
fn test_fenced_response() {
    let text = format!("```xml\n{}\n```", FULL_RESPONSE);
    let parsed = parse_response(&text).unwrap();
    assert_eq!(parsed.tools.len(), 1);
    assert_eq!(parsed.final_answer, "Reading it now.");
}

#[test]
fn test_single_object_and_numeric_id() {
    let parsed =
        parse_response(r#"<tools>{"id":7,"name":"get_system_info","parameters":{}}</tools>"#)
            .unwrap();
    assert_eq!(parsed.tools.len(), 1);
    assert_eq!(parsed.tools[0].id, "7");
}

#[test]
fn test_malformed_tools_keep_other_sections() {
    let parsed =
        parse_response("<tools>[{not json</tools><final_answer>ok</final_answer>").unwrap();
    assert!(parsed.tools.is_empty());
    assert_eq!(parsed.final_answer, "ok");
}

#[test]
fn test_repeated_section_keeps_last() {
    let parsed = parse_response("<thinking>one</thinking><thinking>two</thinking>").unwrap();
    assert_eq!(parsed.thinking, "two");
}

#[test]
fn test_empty_and_tagless_input() {
    assert!(parse_response("").is_none());
    assert!(parse_response("plain prose without sections").is_none());
}

#[test]
fn test_strict_mode_reports_overlap() {
    let text = "<thinking>a<tools>[]</tools></thinking>";
    assert!(parse_response(text).is_some());

    let err = parse_response_with_mode(text, ParserMode::Strict).unwrap_err();
    assert!(err.to_string().contains("overlapping sections"));
}
