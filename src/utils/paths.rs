//! Cross-Platform Path Utilities
//!
//! Resolves the per-user Nexus Agent directory (`~/.nexus-agent/`).

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Nexus Agent directory (~/.nexus-agent/)
pub fn nexus_agent_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".nexus-agent"))
}

/// Get the config file path (~/.nexus-agent/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(nexus_agent_dir()?.join("config.json"))
}
