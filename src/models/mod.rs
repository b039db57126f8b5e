//! Data Models
//!
//! Configuration and response envelope types.

pub mod response;
pub mod settings;

pub use response::{AgentInfo, CommandResponse, ProcessData, ProcessResponse};
pub use settings::{AgentConfig, ConfigOverrides};
