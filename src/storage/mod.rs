//! Storage Layer
//!
//! Configuration file handling.

pub mod config;

pub use config::{ConfigService, WORKSPACE_ROOT_ENV};
