//! Nexus Agent Tools
//!
//! Everything between a parsed tool call and its result string:
//! - `ToolOutcome` - handler result type
//! - `ToolExecutionContext` - workspace guard, locks, search backend, command settings
//! - `OperationPolicy` - per-operation enable/disable table
//! - `LockRegistry` - advisory per-path / per-variable locks
//! - `impls` - handlers for file, content, system, web and command operations
//! - `Dispatcher` - concurrent, order-preserving execution of a call batch

pub mod context;
pub mod dispatcher;
pub mod executor;
pub mod impls;
pub mod locks;
pub mod policy;

// Re-export core types
pub use context::{ToolExecutionContext, DEFAULT_OUTPUT_LIMIT};
pub use dispatcher::{Dispatcher, DEFAULT_CALL_TIMEOUT};
pub use executor::ToolOutcome;
pub use impls::{CommandMode, SearchProvider, StubSearchProvider};
pub use locks::{LockKey, LockRegistry, LockSet};
pub use policy::OperationPolicy;
