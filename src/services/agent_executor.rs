//! Agent Executor
//!
//! Single entry point for callers: takes the full text of a model response,
//! parses it, runs its tool calls inside the configured workspace, and returns
//! one result per call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nexus_agent_core::{
    parse_response_with_mode, OperationName, ParsedResponse, PathGuard, RiskLevel, ToolResult,
};
use nexus_agent_tools::{Dispatcher, SearchProvider, ToolExecutionContext};

use crate::models::response::{AgentInfo, CommandResponse, ProcessData, ProcessResponse};
use crate::models::settings::AgentConfig;
use crate::utils::error::{AppError, AppResult};

/// Parses model responses and executes their tool calls.
#[derive(Debug, Clone)]
pub struct AgentExecutor {
    config: AgentConfig,
    dispatcher: Dispatcher,
}

impl AgentExecutor {
    /// Build an executor. Without a configured root the current directory is used.
    pub fn new(config: AgentConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::validation)?;

        let guard = match &config.workspace_root {
            Some(root) => PathGuard::new(root)?,
            None => PathGuard::current_dir()?,
        };
        tracing::info!("Agent workspace root: {}", guard.root().display());

        let ctx = ToolExecutionContext::new(guard)
            .with_command_mode(config.command_mode)
            .with_output_limit(config.command_output_limit);
        let dispatcher = build_dispatcher(ctx, &config);

        Ok(Self { config, dispatcher })
    }

    /// Replace the `search_web` backend.
    pub fn with_search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        let ctx = self.dispatcher.context().clone().with_search_provider(provider);
        self.dispatcher = build_dispatcher(ctx, &self.config);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        self.dispatcher.context().guard.root()
    }

    /// Parse `text` and execute every tool call in it.
    ///
    /// Fails only when the text yields no section content at all (or, in
    /// strict mode, when sections overlap). Individual call failures are
    /// reported in the returned results.
    pub async fn process(&self, text: &str) -> AppResult<Vec<ToolResult>> {
        tracing::info!("Processing response content, {} chars", text.chars().count());

        let parsed = match parse_response_with_mode(text, self.config.parser_mode())? {
            Some(parsed) => parsed,
            None => {
                tracing::error!("Response content could not be parsed");
                return Err(AppError::parse("could not parse response content"));
            }
        };

        let results = self.process_response(&parsed).await;
        tracing::info!("Processing complete, {} result(s)", results.len());
        Ok(results)
    }

    /// Execute the tool calls of an already-parsed response.
    pub async fn process_response(&self, response: &ParsedResponse) -> Vec<ToolResult> {
        self.dispatcher.dispatch(&response.tools).await
    }

    /// `process` wrapped in the `{success, data, error}` envelope.
    pub async fn process_envelope(&self, text: &str) -> ProcessResponse {
        self.process(text).await.map(ProcessData::now).into()
    }

    pub fn info(&self) -> AgentInfo {
        let policy = self.dispatcher.policy();
        AgentInfo {
            workspace_root: PathBuf::from(self.workspace_root()),
            supported_tools: OperationName::ALL.to_vec(),
            disabled_operations: policy.disabled().collect(),
            high_risk_operations: OperationName::ALL
                .iter()
                .copied()
                .filter(|op| policy.is_enabled(*op) && op.risk_level() == RiskLevel::High)
                .collect(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// `info` wrapped in the response envelope.
    pub fn info_envelope(&self) -> CommandResponse<AgentInfo> {
        CommandResponse::ok(self.info())
    }
}

fn build_dispatcher(ctx: ToolExecutionContext, config: &AgentConfig) -> Dispatcher {
    Dispatcher::new(ctx)
        .with_policy(config.policy())
        .with_timeout(config.call_timeout())
}
