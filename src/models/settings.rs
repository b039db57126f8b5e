//! Settings Models
//!
//! Agent configuration as stored in `config.json`, plus the command-line
//! overrides applied on top of it.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nexus_agent_core::{OperationName, ParserMode};
use nexus_agent_tools::{CommandMode, OperationPolicy, DEFAULT_CALL_TIMEOUT, DEFAULT_OUTPUT_LIMIT};

/// Agent configuration. Every key is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Confinement root; `None` means `$WORKSPACE_ROOT` or the current directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,
    /// Per-call deadline in seconds; 0 disables it
    pub call_timeout_secs: u64,
    /// Operations refused before their handler runs
    pub disabled_operations: Vec<OperationName>,
    /// Reject responses with nested or overlapping sections
    pub strict_parsing: bool,
    /// How `run_command` launches processes
    pub command_mode: CommandMode,
    /// Truncation limit for command output, in characters
    pub command_output_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT.as_secs(),
            disabled_operations: OperationPolicy::DISABLED_BY_DEFAULT.to_vec(),
            strict_parsing: false,
            command_mode: CommandMode::default(),
            command_output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }
}

impl AgentConfig {
    /// Config rooted at `root` with every other setting at its default.
    pub fn with_workspace_root(root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if let Some(root) = &self.workspace_root {
            if root.as_os_str().is_empty() {
                return Err("workspaceRoot must not be empty".to_string());
            }
        }

        if self.command_output_limit == 0 {
            return Err("commandOutputLimit must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(root) = overrides.workspace_root {
            self.workspace_root = Some(root);
        }
        if overrides.allow_all {
            self.disabled_operations.clear();
        }
        if overrides.strict {
            self.strict_parsing = true;
        }
    }

    pub fn policy(&self) -> OperationPolicy {
        OperationPolicy::with_disabled(self.disabled_operations.iter().copied())
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }

    pub fn parser_mode(&self) -> ParserMode {
        if self.strict_parsing {
            ParserMode::Strict
        } else {
            ParserMode::Lenient
        }
    }
}

/// Overrides collected from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub workspace_root: Option<PathBuf>,
    pub allow_all: bool,
    pub strict: bool,
}
