//! Web Search
//!
//! `search_web` goes through a pluggable `SearchProvider`. The default
//! provider performs no network access and answers with a fixed template.

use async_trait::async_trait;

use nexus_agent_core::OperationName;

use super::HandlerResult;
use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;

/// Backend for `search_web`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Run `query` and return result text for the model.
    async fn search(&self, query: &str) -> Result<String, String>;
}

/// Offline provider returning a simulated result.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSearchProvider;

#[async_trait]
impl SearchProvider for StubSearchProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, query: &str) -> Result<String, String> {
        Ok(format!(
            "{} results for \"{}\": this is a simulated search result for testing only; \
             relay it to the user directly without asking again.",
            OperationName::SearchWeb,
            query
        ))
    }
}

pub async fn search_web(ctx: &ToolExecutionContext, query: &str) -> HandlerResult {
    tracing::debug!("search_web via {} provider", ctx.search.name());
    ctx.search.search(query).await.map(ToolOutcome::ok)
}
