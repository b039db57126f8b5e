//! Dispatcher
//!
//! Runs every tool call of one response concurrently and returns one
//! `ToolResult` per call, in input order. Per call, in this order:
//!
//! 1. resolve the operation name (unknown names never reach a handler)
//! 2. build typed parameters (missing or ill-typed fields never reach a handler)
//! 3. consult the operation policy
//! 4. take advisory locks and run the handler under the call deadline
//!
//! Each call is its own spawned task. A failure, timeout, or panic in one call
//! becomes that call's result string and never affects its siblings.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinError;

use nexus_agent_core::{OperationName, ToolCall, ToolParameters, ToolResult};

use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;
use crate::impls;
use crate::policy::OperationPolicy;

/// Default per-call deadline.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Dispatcher {
    ctx: ToolExecutionContext,
    policy: Arc<OperationPolicy>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Dispatcher with the conservative policy and the default deadline.
    pub fn new(ctx: ToolExecutionContext) -> Self {
        Self {
            ctx,
            policy: Arc::new(OperationPolicy::default()),
            timeout: Some(DEFAULT_CALL_TIMEOUT),
        }
    }

    pub fn with_policy(mut self, policy: OperationPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// `None` lets calls run without a deadline.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn context(&self) -> &ToolExecutionContext {
        &self.ctx
    }

    pub fn policy(&self) -> &OperationPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run all `calls` concurrently; `result[i].id == calls[i].id`.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        if calls.is_empty() {
            return Vec::new();
        }
        tracing::info!("Dispatching {} tool call(s)", calls.len());

        let handles: Vec<_> = calls
            .iter()
            .cloned()
            .map(|call| {
                let ctx = self.ctx.clone();
                let policy = self.policy.clone();
                let timeout = self.timeout;
                tokio::spawn(async move { run_call(&ctx, &policy, timeout, call).await })
            })
            .collect();

        let results: Vec<ToolResult> = join_all(handles)
            .await
            .into_iter()
            .zip(calls)
            .map(|(joined, call)| match joined {
                Ok(result) => result,
                Err(e) => ToolResult::new(call.id.clone(), join_failure(&call.name, e)),
            })
            .collect();

        tracing::info!("Finished {} tool call(s)", results.len());
        results
    }

    /// Run a single call on the current task.
    pub async fn dispatch_one(&self, call: ToolCall) -> ToolResult {
        run_call(&self.ctx, &self.policy, self.timeout, call).await
    }
}

async fn run_call(
    ctx: &ToolExecutionContext,
    policy: &OperationPolicy,
    timeout: Option<Duration>,
    call: ToolCall,
) -> ToolResult {
    let operation = match call.name.parse::<OperationName>() {
        Ok(op) => op,
        Err(e) => {
            tracing::warn!("Unknown operation requested: {:?}", call.name);
            return ToolResult::new(call.id, e.to_string());
        }
    };

    let params = match ToolParameters::from_bag(operation, &call.parameters) {
        Ok(params) => params,
        Err(e) => {
            tracing::debug!("Call {} rejected: {}", call.id, e);
            return ToolResult::new(call.id, e.to_string());
        }
    };

    if !policy.is_enabled(operation) {
        tracing::warn!("Operation {} is disabled by policy", operation);
        return ToolResult::new(call.id, OperationPolicy::refusal(operation));
    }

    tracing::debug!(
        "Executing {} (id {}, {:?}, risk {:?})",
        operation,
        call.id,
        operation.category(),
        operation.risk_level()
    );
    let keys = impls::lock_keys(ctx, &params);
    let work = async {
        let _locks = ctx.locks.acquire(keys).await;
        impls::execute(ctx, &params).await
    };

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!("{} (id {}) timed out after {:?}", operation, call.id, limit);
                ToolOutcome::err(format!(
                    "{} timed out after {}s",
                    operation,
                    limit.as_secs_f64()
                ))
            }
        },
        None => work.await,
    };

    ToolResult::new(call.id, outcome.to_content())
}

fn join_failure(name: &str, error: JoinError) -> String {
    if error.is_panic() {
        tracing::error!("Handler for {} panicked", name);
        format!("{} failed: handler panicked", name)
    } else {
        tracing::warn!("Task for {} was cancelled", name);
        format!("{} failed: task cancelled", name)
    }
}
