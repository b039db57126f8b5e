//! Nexus Agent Core
//!
//! Protocol types for the Nexus agent: the response section parser, the
//! operation catalogue, typed parameter shapes, and workspace path
//! confinement. This crate performs no tool I/O and has no dependency on the
//! async runtime.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `path_guard` - Workspace confinement (`PathGuard`, `ConfinedPath`)
//! - `operation` - The closed operation set (`OperationName`, `RiskLevel`)
//! - `call` - Wire data (`ToolCall`, `ToolResult`, `ParsedResponse`)
//! - `params` - Typed parameter shapes (`ToolParameters`, `ShapeError`)
//! - `parser` - Streaming section parser (`ResponseParser`, `parse_response`)
//!
//! ## Design Principles
//!
//! 1. **No runtime dependencies beyond serde/thiserror/tracing**
//! 2. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod call;
pub mod error;
pub mod operation;
pub mod params;
pub mod parser;
pub mod path_guard;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Path Confinement ───────────────────────────────────────────────────
pub use path_guard::{confine, ConfinedPath, PathGuard};

// ── Operations & Parameters ────────────────────────────────────────────
pub use operation::{OperationCategory, OperationName, RiskLevel};
pub use params::{missing_fields, shape_ok, ShapeError, ToolParameters};

// ── Wire Types ─────────────────────────────────────────────────────────
pub use call::{ParsedResponse, ToolCall, ToolResult};

// ── Parser ─────────────────────────────────────────────────────────────
pub use parser::{
    decode_tools, parse_response, parse_response_with_mode, strip_code_fence, NestingViolation,
    ParseState, ParserMode, ResponseParser,
};
