//! Workspace Confinement Integration Tests
//!
//! No operation may touch a path outside the workspace root, whatever form
//! the path takes.

use nexus_agent::nexus_agent_core::{confine, CoreError, PathGuard};
use nexus_agent::{AgentConfig, AgentExecutor, ConfigOverrides};
use tempfile::TempDir;

fn permissive_agent(root: &std::path::Path) -> AgentExecutor {
    let mut config = AgentConfig::with_workspace_root(root);
    config.apply_overrides(ConfigOverrides {
        allow_all: true,
        ..ConfigOverrides::default()
    });
    AgentExecutor::new(config).unwrap()
}

#[test]
fn test_guard_rejects_escapes() {
    let dir = TempDir::new().unwrap();
    let guard = PathGuard::new(dir.path()).unwrap();

    assert!(guard.confine("notes/a.txt").is_ok());
    assert!(guard.confine("notes/../a.txt").is_ok());
    assert!(guard.confine(".").is_ok());

    for escape in ["../outside.txt", "a/../../outside.txt", "/etc/passwd"] {
        match guard.confine(escape) {
            Err(CoreError::OutOfBounds { .. }) => {}
            other => panic!("{} was not rejected: {:?}", escape, other),
        }
    }
}

#[test]
fn test_sibling_with_shared_prefix_is_outside() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("ws");
    std::fs::create_dir(&root).unwrap();

    let sibling = parent.path().join("ws-other").join("x.txt");
    assert!(confine(&root, sibling.to_str().unwrap()).is_err());
}

#[tokio::test]
async fn test_read_outside_root_is_refused() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("ws");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(parent.path().join("outside.txt"), "secret").unwrap();

    let text = r#"<tools>{"id":"1","name":"read_file","parameters":{"filePath":"../outside.txt"}}</tools>"#;
    let results = permissive_agent(&root).process(text).await.unwrap();

    assert!(results[0].result.contains("read_file failed"));
    assert!(results[0].result.contains("out of bounds"));
    assert!(!results[0].result.contains("secret"));
}

#[tokio::test]
async fn test_write_and_move_outside_root_are_refused() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("ws");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("inside.txt"), "data").unwrap();

    let text = r#"<tools>[
        {"id":"w","name":"write_file","parameters":{"filePath":"../dropped.txt","content":"x"}},
        {"id":"m","name":"move_file","parameters":{"sourcePath":"inside.txt","targetPath":"../moved.txt"}}
    ]</tools>"#;
    let results = permissive_agent(&root).process(text).await.unwrap();

    assert!(results.iter().all(|r| r.result.contains("out of bounds")));
    assert!(!parent.path().join("dropped.txt").exists());
    assert!(!parent.path().join("moved.txt").exists());
    assert!(root.join("inside.txt").exists());
}

#[tokio::test]
async fn test_root_cannot_be_deleted() {
    let dir = TempDir::new().unwrap();
    let text = r#"<tools>{"id":"1","name":"delete_directory","parameters":{"dirPath":".","recursive":true}}</tools>"#;
    let results = permissive_agent(dir.path()).process(text).await.unwrap();

    assert!(results[0].result.contains("delete_directory failed"));
    assert!(dir.path().exists());
}
