//! Integration Tests Module
//!
//! End-to-end tests for Nexus Agent: response parsing, concurrent dispatch,
//! the agent facade, and workspace confinement.

// Streaming parser and section extraction tests
mod parser_test;

// Dispatcher ordering, policy and race tests
mod dispatch_test;

// AgentExecutor and configuration tests
mod agent_test;

// Path confinement tests
mod sandbox_test;
