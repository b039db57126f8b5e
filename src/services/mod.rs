//! Services
//!
//! Business logic services for the application.

pub mod agent_executor;

pub use agent_executor::AgentExecutor;
