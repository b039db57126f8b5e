//! Agent Executor Integration Tests
//!
//! Whole-response processing through the public facade, plus configuration
//! loading from disk.

use nexus_agent::nexus_agent_core::{OperationName, ToolResult};
use nexus_agent::{AgentConfig, AgentExecutor, ConfigOverrides, ConfigService};
use tempfile::TempDir;

fn agent(dir: &TempDir, allow_all: bool) -> AgentExecutor {
    let mut config = AgentConfig::with_workspace_root(dir.path());
    config.apply_overrides(ConfigOverrides {
        allow_all,
        ..ConfigOverrides::default()
    });
    AgentExecutor::new(config).unwrap()
}

#[tokio::test]
async fn test_read_hello() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("greeting.txt"), "hello").unwrap();

    let text = r#"<thinking>Look at the greeting.</thinking>
<tools>[{"id":"t1","name":"read_file","parameters":{"filePath":"greeting.txt"}}]</tools>"#;
    let results = agent(&dir, false).process(text).await.unwrap();

    assert_eq!(results, vec![ToolResult::new("t1", "hello")]);
}

#[tokio::test]
async fn test_insert_out_of_range() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let text = r#"<tools>[
        {"id":"neg","name":"insert_file_content","parameters":{"filePath":"a.txt","position":-1,"content":"x"}},
        {"id":"big","name":"insert_file_content","parameters":{"filePath":"a.txt","position":6,"content":"x"}}
    ]</tools>"#;
    let results = agent(&dir, false).process(text).await.unwrap();

    for result in &results {
        assert!(result.result.contains("insert_file_content failed"), "{}", result.result);
        assert!(result.result.contains("(0-5)"), "{}", result.result);
    }
    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "hello");
}

#[tokio::test]
async fn test_insert_at_end() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let text = r#"<tools>{"id":"1","name":"insert_file_content","parameters":{"filePath":"a.txt","position":5,"content":" world"}}</tools>"#;
    let results = agent(&dir, false).process(text).await.unwrap();

    assert!(results[0].result.contains("insert_file_content succeeded"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
        "hello world"
    );
}

#[tokio::test]
async fn test_replace_not_found_leaves_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let text = r#"<tools>{"id":"1","name":"replace_file_content","parameters":{"filePath":"a.txt","oldContent":"bye","newContent":"hi"}}</tools>"#;
    let results = agent(&dir, false).process(text).await.unwrap();

    assert!(results[0].result.contains("replace_file_content failed"));
    assert!(results[0].result.contains("old content not found"));
    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "hello");
}

#[tokio::test]
async fn test_search_web_stub() {
    let dir = TempDir::new().unwrap();
    let text = r#"<tools>{"id":"s","name":"search_web","parameters":{"query":"weather today"}}</tools>"#;
    let results = agent(&dir, false).process(text).await.unwrap();

    assert!(results[0].result.contains("weather today"));
}

#[tokio::test]
async fn test_disabled_operation_refused_then_allowed() {
    let dir = TempDir::new().unwrap();
    let text = r#"<tools>{"id":"w","name":"write_file","parameters":{"filePath":"n.txt","content":"data"}}</tools>"#;

    let refused = agent(&dir, false).process(text).await.unwrap();
    assert_eq!(refused[0].result, "User declined to execute write_file");
    assert!(!dir.path().join("n.txt").exists());

    let allowed = agent(&dir, true).process(text).await.unwrap();
    assert!(allowed[0].result.contains("write_file succeeded"));
    assert_eq!(std::fs::read_to_string(dir.path().join("n.txt")).unwrap(), "data");
}

#[tokio::test]
async fn test_envelope_serialization() {
    let dir = TempDir::new().unwrap();
    let response = agent(&dir, false)
        .process_envelope("<final_answer>done</final_answer>")
        .await;

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["result"], serde_json::json!([]));
    assert!(value["data"]["timestamp"].is_string());
}

#[test]
fn test_info_lists_every_operation() {
    let dir = TempDir::new().unwrap();
    let info = agent(&dir, true).info();
    assert_eq!(info.supported_tools, OperationName::ALL.to_vec());
    assert!(info.disabled_operations.is_empty());
    assert_eq!(info.high_risk_operations.len(), 6);
    assert!(info.high_risk_operations.contains(&OperationName::RunCommand));
}

#[tokio::test]
async fn test_config_file_drives_executor() {
    let dir = TempDir::new().unwrap();
    let workspace = dir.path().join("ws");
    std::fs::create_dir(&workspace).unwrap();
    std::fs::write(workspace.join("f.txt"), "from config").unwrap();

    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        serde_json::json!({
            "workspaceRoot": workspace,
            "disabledOperations": []
        })
        .to_string(),
    )
    .unwrap();

    let service = ConfigService::load(Some(config_path.as_path())).unwrap();
    let agent = AgentExecutor::new(service.into_config()).unwrap();

    let text = r#"<tools>{"id":"1","name":"read_file","parameters":{"filePath":"f.txt"}}</tools>"#;
    let results = agent.process(text).await.unwrap();
    assert_eq!(results[0].result, "from config");
    assert!(agent.info().disabled_operations.is_empty());
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = TempDir::new().unwrap();
    assert!(ConfigService::load(Some(dir.path().join("missing.json").as_path())).is_err());
}
