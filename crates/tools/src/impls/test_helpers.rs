//! Shared test utilities for handler unit tests.

use std::path::Path;

use nexus_agent_core::PathGuard;

use crate::context::ToolExecutionContext;

/// Create a `ToolExecutionContext` rooted at `dir` with default settings.
pub(crate) fn make_test_ctx(dir: &Path) -> ToolExecutionContext {
    ToolExecutionContext::new(PathGuard::new(dir).unwrap())
}

/// Poll until `ps` no longer lists `pid` as a live (non-zombie) process.
#[cfg(unix)]
pub(crate) async fn wait_until_gone(pid: &str) -> bool {
    for _ in 0..40 {
        let out = std::process::Command::new("ps")
            .args(["-o", "stat=", "-p", pid])
            .output()
            .unwrap();
        let stat = String::from_utf8_lossy(&out.stdout);
        if stat.trim().is_empty() || stat.trim().starts_with('Z') {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    false
}
