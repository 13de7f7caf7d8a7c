//! MCP client over any transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use serde_json::json;
use tracing::{debug, info};

use crate::protocol::{
    CallToolResult, ListToolsPage, PROTOCOL_VERSION, RpcNotification, RpcRequest, ToolDescriptor,
    methods,
};
use crate::transport::{Transport, TransportError};

/// Upper bound on `tools/list` pages followed in one listing.
const MAX_LIST_PAGES: usize = 64;

/// MCP client errors.
#[derive(Debug, thiserror::Error)]
pub enum McpClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Server error ({code}): {message}")]
    Server { code: i32, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Client for one MCP server.
pub struct McpClient {
    transport: Arc<dyn Transport>,
    next_id: AtomicI64,
    server_info: Option<serde_json::Value>,
}

impl McpClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: AtomicI64::new(1),
            server_info: None,
        }
    }

    /// Server details reported during the handshake.
    pub fn server_info(&self) -> Option<&serde_json::Value> {
        self.server_info.as_ref()
    }

    async fn call(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, McpClientError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut request = RpcRequest::new(id, method);
        if let Some(p) = params {
            request = request.with_params(p);
        }

        debug!("Sending MCP request: {} (id={})", method, id);
        let response = self.transport.request(request).await?;

        response.into_result().map_err(|e| McpClientError::Server {
            code: e.code,
            message: e.message,
        })
    }

    /// Run the initialize handshake.
    pub async fn initialize(&mut self) -> Result<serde_json::Value, McpClientError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "lyceum",
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        let result = self.call(methods::INITIALIZE, Some(params)).await?;
        self.transport
            .notify(RpcNotification::new(methods::INITIALIZED))
            .await?;

        let info = result.get("serverInfo").cloned().unwrap_or(serde_json::Value::Null);
        info!(
            "MCP connection initialized: {}",
            info.get("name").and_then(|n| n.as_str()).unwrap_or("unnamed server")
        );
        self.server_info = Some(info);
        Ok(result)
    }

    /// List every tool, following pagination cursors.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpClientError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let params = cursor.take().map(|c| json!({ "cursor": c }));
            let result = self.call(methods::LIST_TOOLS, params).await?;
            let page: ListToolsPage = serde_json::from_value(result)
                .map_err(|e| McpClientError::Protocol(e.to_string()))?;

            tools.extend(page.tools);
            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => return Ok(tools),
            }
        }

        Err(McpClientError::Protocol(format!(
            "tools/list did not finish within {} pages",
            MAX_LIST_PAGES
        )))
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, McpClientError> {
        let params = json!({ "name": name, "arguments": arguments });
        let result = self.call(methods::CALL_TOOL, Some(params)).await?;
        serde_json::from_value(result).map_err(|e| McpClientError::Protocol(e.to_string()))
    }

    pub async fn close(&self) -> Result<(), McpClientError> {
        self.transport.close().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
