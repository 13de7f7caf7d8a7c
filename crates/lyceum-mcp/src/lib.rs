//! Model Context Protocol tool servers.
//!
//! Connects the runtime's tool router to external MCP servers reached over
//! a child process (stdio) or HTTP.

mod client;
mod http_transport;
mod protocol;
mod server;
mod transport;

pub use client::{McpClient, McpClientError};
pub use http_transport::HttpTransport;
pub use protocol::{
    CallToolResult, ContentItem, RequestId, RpcError, RpcNotification, RpcRequest, RpcResponse,
    ToolDescriptor, methods,
};
pub use server::McpToolServer;
pub use transport::{StdioTransport, Transport, TransportError};
