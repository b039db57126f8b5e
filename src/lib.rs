//! Nexus Agent
//!
//! Executes the tool calls an LLM writes into its response. The response text
//! is split into sections, the `<tools>` section is decoded into calls, and
//! every call runs concurrently inside a confined workspace directory.
//!
//! It includes:
//! - The `AgentExecutor` facade (`process(text) -> results`)
//! - Layered configuration (`AgentConfig`, `ConfigService`)
//! - Response envelopes and the application error type
//!
//! Parsing and the protocol types live in `nexus-agent-core`; handlers and
//! the dispatcher live in `nexus-agent-tools`. Both are re-exported here.

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use nexus_agent_core;
pub use nexus_agent_tools;

pub use models::response::{AgentInfo, CommandResponse, ProcessData, ProcessResponse};
pub use models::settings::{AgentConfig, ConfigOverrides};
pub use services::AgentExecutor;
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
