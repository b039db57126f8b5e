//! JSON Configuration Management
//!
//! Builds the effective `AgentConfig` in layers: defaults, then the JSON file,
//! then `WORKSPACE_ROOT` from the environment, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{AgentConfig, ConfigOverrides};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::config_path;

/// Environment variable naming the workspace root
pub const WORKSPACE_ROOT_ENV: &str = "WORKSPACE_ROOT";

/// Configuration service for loading agent settings
#[derive(Debug, Default)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: AgentConfig,
}

impl ConfigService {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.nexus-agent/config.json`
    /// is read if present and defaults are used otherwise. The environment is
    /// applied on top either way.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let (config_path, config) = match explicit {
            Some(path) => (Some(path.to_path_buf()), Self::load_from_file(path)?),
            None => match config_path() {
                Ok(path) if path.exists() => {
                    let config = Self::load_from_file(&path)?;
                    (Some(path), config)
                }
                _ => (None, AgentConfig::default()),
            },
        };

        let mut service = Self {
            config_path,
            config,
        };
        service.apply_env(|key| std::env::var(key).ok());
        Ok(service)
    }

    /// Wrap an already-built configuration.
    pub fn from_config(config: AgentConfig) -> Self {
        Self {
            config_path: None,
            config,
        }
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AgentConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("could not read {}: {}", path.display(), e))
        })?;
        let config: AgentConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Apply environment settings through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup(WORKSPACE_ROOT_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Workspace root from {}: {}", WORKSPACE_ROOT_ENV, root);
            self.config.workspace_root = Some(PathBuf::from(root));
        }
    }

    /// Apply command-line overrides and re-validate
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> AppResult<()> {
        self.config.apply_overrides(overrides);
        self.config.validate().map_err(AppError::validation)
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn into_config(self) -> AgentConfig {
        self.config
    }

    /// File the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
