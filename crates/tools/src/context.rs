//! Tool Execution Context
//!
//! Everything a handler may reach besides its own parameters: the workspace
//! guard, the shared lock table, the search backend, and command settings.
//! Cloning is cheap; the dispatcher hands one clone to each spawned call.

use std::sync::Arc;

use nexus_agent_core::{ConfinedPath, CoreResult, PathGuard};

use crate::impls::command::CommandMode;
use crate::impls::web::{SearchProvider, StubSearchProvider};
use crate::locks::LockRegistry;

/// Default cap on captured command output, in characters.
pub const DEFAULT_OUTPUT_LIMIT: usize = 30_000;

#[derive(Clone)]
pub struct ToolExecutionContext {
    /// Confinement root for every path-taking operation
    pub guard: PathGuard,
    /// Advisory locks shared across concurrent calls
    pub locks: Arc<LockRegistry>,
    /// Backend for `search_web`
    pub search: Arc<dyn SearchProvider>,
    /// How `run_command` launches processes
    pub command_mode: CommandMode,
    /// Truncation limit for captured command output
    pub output_limit: usize,
}

impl ToolExecutionContext {
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            locks: Arc::new(LockRegistry::new()),
            search: Arc::new(StubSearchProvider),
            command_mode: CommandMode::default(),
            output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }

    pub fn with_search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = provider;
        self
    }

    pub fn with_command_mode(mut self, mode: CommandMode) -> Self {
        self.command_mode = mode;
        self
    }

    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.output_limit = limit;
        self
    }

    /// Confine `candidate` to the workspace root.
    pub fn confine(&self, candidate: &str) -> CoreResult<ConfinedPath> {
        self.guard.confine(candidate)
    }

    /// Workspace-relative rendering of a confined path, for messages.
    pub fn display(&self, path: &ConfinedPath) -> String {
        let relative = self.guard.relative(path);
        if relative.as_os_str().is_empty() {
            ".".to_string()
        } else {
            relative.display().to_string()
        }
    }
}

impl std::fmt::Debug for ToolExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutionContext")
            .field("root", &self.guard.root())
            .field("search", &self.search.name())
            .field("command_mode", &self.command_mode)
            .field("output_limit", &self.output_limit)
            .finish()
    }
}
