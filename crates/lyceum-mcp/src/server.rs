//! Exposes an MCP server to the runtime as a [`ToolServer`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use lyceum_config::{ToolServerConfig, TransportKind};
use lyceum_protocols::{ToolError, ToolOutput, ToolServer, ToolSpec};

use crate::client::{McpClient, McpClientError};
use crate::http_transport::HttpTransport;
use crate::transport::{StdioTransport, Transport};

/// A connected MCP server.
pub struct McpToolServer {
    id: String,
    client: McpClient,
}

impl McpToolServer {
    /// Start or reach the configured server and run the handshake.
    pub async fn connect(config: &ToolServerConfig) -> Result<Self, McpClientError> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let transport: Arc<dyn Transport> = match config.transport {
            TransportKind::Stdio => {
                let command = config.command.as_deref().ok_or_else(|| {
                    McpClientError::Config(format!("tool server {} has no command", config.id))
                })?;
                Arc::new(
                    StdioTransport::spawn(command, &config.args, &config.env)
                        .await?
                        .with_timeout(timeout),
                )
            }
            TransportKind::Http => {
                let url = config.url.as_deref().ok_or_else(|| {
                    McpClientError::Config(format!("tool server {} has no url", config.id))
                })?;
                Arc::new(
                    HttpTransport::new(url, timeout)?
                        .with_authorization(config.authorization.clone())
                        .with_headers(config.headers.clone()),
                )
            }
        };

        let mut client = McpClient::new(transport);
        tokio::time::timeout(timeout, client.initialize())
            .await
            .map_err(|_| McpClientError::Timeout(config.timeout_seconds))??;

        info!("Connected tool server {}", config.id);
        Ok(Self::from_client(config.id.clone(), client))
    }

    /// Wrap an already initialized client. Call limits belong to its transport.
    pub fn from_client(id: impl Into<String>, client: McpClient) -> Self {
        Self {
            id: id.into(),
            client,
        }
    }

    pub async fn shutdown(&self) -> Result<(), McpClientError> {
        self.client.close().await
    }
}

#[async_trait]
impl ToolServer for McpToolServer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        let tools = self
            .client
            .list_tools()
            .await
            .map_err(|e| ToolError::Server(format!("{}: {}", self.id, e)))?;

        Ok(tools
            .into_iter()
            .map(|t| {
                ToolSpec::new(t.name, t.description.unwrap_or_default())
                    .with_input_schema(t.input_schema)
            })
            .collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        debug!("Calling {} on tool server {}", name, self.id);

        let result = self
            .client
            .call_tool(name, input)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool: name.to_string(),
                message: e.to_string(),
            })?;

        let text = result.text();
        Ok(if result.is_error {
            ToolOutput::error(text)
        } else {
            ToolOutput::success(text)
        })
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
