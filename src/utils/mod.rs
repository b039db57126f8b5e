//! Utilities
//!
//! Application error type and per-user directory resolution.

pub mod error;
pub mod paths;

pub use error::{AppError, AppResult};
pub use paths::{config_path, home_dir, nexus_agent_dir};
