//! Dispatcher Integration Tests
//!
//! Concurrent execution of real handlers against a temporary workspace.

use nexus_agent::nexus_agent_core::{PathGuard, ToolCall};
use nexus_agent::nexus_agent_tools::{Dispatcher, OperationPolicy, ToolExecutionContext};
use serde_json::json;
use tempfile::TempDir;

fn dispatcher(dir: &TempDir, policy: OperationPolicy) -> Dispatcher {
    let ctx = ToolExecutionContext::new(PathGuard::new(dir.path()).unwrap());
    Dispatcher::new(ctx).with_policy(policy)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_results_follow_call_order() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    std::fs::write(dir.path().join("b.txt"), "beta").unwrap();

    let calls = vec![
        ToolCall::new("b", "read_file", json!({ "filePath": "b.txt" })),
        ToolCall::new("x", "nope", json!({})),
        ToolCall::new("a", "read_file", json!({ "filePath": "a.txt" })),
    ];
    let results = dispatcher(&dir, OperationPolicy::conservative())
        .dispatch(&calls)
        .await;

    let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "x", "a"]);
    assert_eq!(results[0].result, "beta");
    assert_eq!(results[1].result, "Unknown operation: nope");
    assert_eq!(results[2].result, "alpha");
}

#[tokio::test]
async fn test_default_policy_refuses_writes() {
    let dir = TempDir::new().unwrap();
    let calls = vec![ToolCall::new(
        "1",
        "write_file",
        json!({ "filePath": "out.txt", "content": "x" }),
    )];
    let results = dispatcher(&dir, OperationPolicy::default()).dispatch(&calls).await;

    assert_eq!(results[0].result, "User declined to execute write_file");
    assert!(!dir.path().join("out.txt").exists());
}

#[tokio::test]
async fn test_shape_error_before_policy() {
    let dir = TempDir::new().unwrap();
    let calls = vec![ToolCall::new("1", "write_file", json!({ "filePath": "out.txt" }))];
    let results = dispatcher(&dir, OperationPolicy::default()).dispatch(&calls).await;

    assert!(results[0].result.contains("write_file parameter error"));
    assert!(results[0].result.contains("content"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_to_same_path_last_wins() {
    let dir = TempDir::new().unwrap();
    let calls = vec![
        ToolCall::new("1", "write_file", json!({ "filePath": "race.txt", "content": "first" })),
        ToolCall::new("2", "write_file", json!({ "filePath": "race.txt", "content": "second" })),
    ];
    let results = dispatcher(&dir, OperationPolicy::allow_all())
        .dispatch(&calls)
        .await;

    assert!(results.iter().all(|r| r.result.contains("write_file succeeded")));
    let content = std::fs::read_to_string(dir.path().join("race.txt")).unwrap();
    assert!(content == "first" || content == "second", "torn write: {:?}", content);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_env_writes_last_wins() {
    let dir = TempDir::new().unwrap();
    let name = "NEXUS_AGENT_DISPATCH_RACE";
    let calls = vec![
        ToolCall::new("1", "set_env_variable", json!({ "name": name, "value": "one" })),
        ToolCall::new("2", "set_env_variable", json!({ "name": name, "value": "two" })),
    ];
    let results = dispatcher(&dir, OperationPolicy::allow_all())
        .dispatch(&calls)
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.result.contains("set_env_variable succeeded")));
    let value = std::env::var(name).unwrap();
    assert!(value == "one" || value == "two");
}

#[tokio::test]
async fn test_file_lifecycle_in_one_batch_per_step() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir, OperationPolicy::allow_all());

    let step = |id: &str, name: &str, params| ToolCall::new(id, name, params);

    let r = d
        .dispatch(&[step("1", "create_directory", json!({ "dirPath": "docs" }))])
        .await;
    assert!(r[0].result.contains("create_directory succeeded"));

    let r = d
        .dispatch(&[step(
            "2",
            "write_file",
            json!({ "filePath": "docs/a.md", "content": "hello" }),
        )])
        .await;
    assert!(r[0].result.contains("wrote 5 bytes"));

    let r = d
        .dispatch(&[step(
            "3",
            "copy_file",
            json!({ "sourcePath": "docs/a.md", "targetPath": "docs/b.md" }),
        )])
        .await;
    assert!(r[0].result.contains("copy_file succeeded"));

    let r = d
        .dispatch(&[step("4", "list_file", json!({ "workspacePath": "docs" }))])
        .await;
    assert_eq!(r[0].result, "[a.md, b.md]");

    let r = d
        .dispatch(&[step(
            "5",
            "delete_directory",
            json!({ "dirPath": "docs", "recursive": true }),
        )])
        .await;
    assert!(r[0].result.contains("2 entries"));
    assert!(!dir.path().join("docs").exists());
}
