//! Tool dispatch across namespaced tool servers.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use lyceum_protocols::tool::QUALIFIED_NAME_SEPARATOR;
use lyceum_protocols::{
    RuntimeError, ToolCall, ToolCatalogEntry, ToolError, ToolOutput, ToolResult, ToolServer,
};

/// Aggregates tool servers and executes calls against them.
pub struct ToolRouter {
    servers: Vec<Arc<dyn ToolServer>>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl ToolRouter {
    /// Default cap on simultaneous tool calls.
    pub const DEFAULT_CONCURRENCY: usize = 8;

    pub fn new() -> Self {
        Self {
            servers: Vec::new(),
            semaphore: Arc::new(Semaphore::new(Self::DEFAULT_CONCURRENCY)),
            concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }

    /// Set the fan-out cap (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        self.semaphore = Arc::new(Semaphore::new(concurrency));
        self.concurrency = concurrency;
        self
    }

    /// Attach a server.
    pub fn with_server(mut self, server: Arc<dyn ToolServer>) -> Self {
        self.register(server);
        self
    }

    pub fn register(&mut self, server: Arc<dyn ToolServer>) {
        debug!("Registered tool server: {}", server.id());
        self.servers.push(server);
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn server_ids(&self) -> Vec<&str> {
        self.servers.iter().map(|s| s.id()).collect()
    }

    /// Aggregated catalog of every server. Any listing failure fails the whole catalog.
    pub async fn catalog(&self) -> Result<Vec<ToolCatalogEntry>, RuntimeError> {
        let mut catalog = Vec::new();

        for server in &self.servers {
            let tools = server
                .list_tools()
                .await
                .map_err(|e| RuntimeError::ToolCatalog {
                    server: server.id().to_string(),
                    message: e.to_string(),
                })?;

            let mut seen = HashSet::new();
            for spec in tools {
                if !seen.insert(spec.name.clone()) {
                    warn!(
                        "Tool server '{}' advertises '{}' twice, keeping the first",
                        server.id(),
                        spec.name
                    );
                    continue;
                }
                catalog.push(ToolCatalogEntry::qualify(server.id(), spec));
            }
        }

        Ok(catalog)
    }

    /// Execute one call. Every failure becomes an error result.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.dispatch(call).await {
            Ok(output) => ToolResult {
                tool_use_id: call.id.clone(),
                tool_name: call.name.clone(),
                content: output.content,
                is_error: output.is_error,
            },
            Err(e) => {
                debug!("Tool call {} ({}) failed: {}", call.id, call.name, e);
                ToolResult::error(call, e.to_result_text())
            }
        }
    }

    /// Execute calls concurrently under the fan-out cap. Results keep input order.
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let tasks = calls.iter().map(|call| async move {
            let _permit = self.semaphore.acquire().await.ok();
            self.execute(call).await
        });
        join_all(tasks).await
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        for server in &self.servers {
            let Some(local) = local_name(server.id(), &call.name) else {
                continue;
            };

            let tools = match server.list_tools().await {
                Ok(tools) => tools,
                Err(e) => {
                    warn!(
                        "Failed to list tools of '{}' while dispatching {}: {}",
                        server.id(),
                        call.name,
                        e
                    );
                    continue;
                }
            };

            if tools.iter().any(|t| t.name == local) {
                return server.call_tool(local, call.input.clone()).await;
            }
        }

        Err(ToolError::NotFound(call.name.clone()))
    }
}

impl Default for ToolRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// The server-local part of `name` if it is namespaced under `server_id`.
fn local_name<'a>(server_id: &str, name: &'a str) -> Option<&'a str> {
    name.strip_prefix(server_id)?
        .strip_prefix(QUALIFIED_NAME_SEPARATOR)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
