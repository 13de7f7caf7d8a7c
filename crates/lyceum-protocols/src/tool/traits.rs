//! Tool server trait definition.

use async_trait::async_trait;

use super::{ToolOutput, ToolSpec};
use crate::error::ToolError;

/// A source of tools reachable through `list_tools` / `call_tool`.
#[async_trait]
pub trait ToolServer: Send + Sync {
    /// Server identity, used as the namespace of its tools.
    fn id(&self) -> &str;

    /// List the tools this server currently exposes.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError>;

    /// Call a tool by its server-local name.
    async fn call_tool(&self, name: &str, input: serde_json::Value)
        -> Result<ToolOutput, ToolError>;
}
