//! Operation Policy
//!
//! A table of which operations may run at all, consulted by the dispatcher
//! after shape validation and before any handler body executes.

use std::collections::BTreeSet;

use nexus_agent_core::OperationName;

/// Per-operation enable/disable table.
///
/// Operations not listed as disabled are enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPolicy {
    disabled: BTreeSet<OperationName>,
}

impl OperationPolicy {
    /// Operations that refuse to run unless explicitly enabled.
    pub const DISABLED_BY_DEFAULT: [OperationName; 7] = [
        OperationName::WriteFile,
        OperationName::DeleteFile,
        OperationName::CopyFile,
        OperationName::MoveFile,
        OperationName::CreateDirectory,
        OperationName::DeleteDirectory,
        OperationName::RunCommand,
    ];

    /// Default table: the mutating file operations and `run_command` are off.
    pub fn conservative() -> Self {
        Self::with_disabled(Self::DISABLED_BY_DEFAULT)
    }

    /// Every operation enabled.
    pub fn allow_all() -> Self {
        Self {
            disabled: BTreeSet::new(),
        }
    }

    pub fn with_disabled(operations: impl IntoIterator<Item = OperationName>) -> Self {
        Self {
            disabled: operations.into_iter().collect(),
        }
    }

    pub fn is_enabled(&self, operation: OperationName) -> bool {
        !self.disabled.contains(&operation)
    }

    pub fn enable(&mut self, operation: OperationName) {
        self.disabled.remove(&operation);
    }

    pub fn disable(&mut self, operation: OperationName) {
        self.disabled.insert(operation);
    }

    /// Disabled operations in declaration order.
    pub fn disabled(&self) -> impl Iterator<Item = OperationName> + '_ {
        self.disabled.iter().copied()
    }

    /// Result text for a call the policy refused.
    pub fn refusal(operation: OperationName) -> String {
        format!("User declined to execute {}", operation)
    }
}

impl Default for OperationPolicy {
    fn default() -> Self {
        Self::conservative()
    }
}
