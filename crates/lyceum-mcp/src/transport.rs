//! Transport layer for MCP communication.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::debug;

use crate::protocol::{RpcNotification, RpcRequest, RpcResponse};

/// A bidirectional JSON-RPC channel to one server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response carrying the same id.
    async fn request(&self, request: RpcRequest) -> Result<RpcResponse, TransportError>;

    /// Send a notification; no response is expected.
    async fn notify(&self, notification: RpcNotification) -> Result<(), TransportError>;

    /// Close the transport.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start server: {0}")]
    Spawn(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("No response for request {0}")]
    NoResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection closed")]
    Closed,
}

struct Pipes {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Newline-delimited JSON-RPC over a child process's stdin/stdout.
pub struct StdioTransport {
    child: Mutex<Option<Child>>,
    pipes: Mutex<Option<Pipes>>,
    timeout: Option<Duration>,
}

impl StdioTransport {
    /// Spawn the server process.
    pub async fn spawn(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<Self, TransportError> {
        let mut child = Command::new(command)
            .args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TransportError::Spawn(format!("{}: {}", command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::Spawn("Failed to capture stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::Spawn("Failed to capture stdout".to_string()))?;

        debug!("Spawned MCP server: {}", command);

        Ok(Self {
            child: Mutex::new(Some(child)),
            pipes: Mutex::new(Some(Pipes {
                stdin,
                stdout: BufReader::new(stdout),
            })),
            timeout: None,
        })
    }

    /// Limit on one request/response exchange. Time spent waiting for the
    /// pipe behind other requests does not count.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn write_line(stdin: &mut ChildStdin, json: String) -> Result<(), TransportError> {
        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }
}

/// Write a request, then read lines until the response with its id arrives.
/// A reply left behind by a timed-out exchange is skipped as stale.
async fn exchange(pipes: &mut Pipes, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
    StdioTransport::write_line(&mut pipes.stdin, serde_json::to_string(request)?).await?;

    let mut line = String::new();
    loop {
        line.clear();
        if pipes.stdout.read_line(&mut line).await? == 0 {
            return Err(TransportError::Closed);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<RpcResponse>(trimmed) {
            Ok(response) if response.id == request.id => return Ok(response),
            Ok(response) => debug!("Skipping response for stale id {:?}", response.id),
            Err(_) => debug!("Skipping non-response line from server: {}", trimmed),
        }
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn request(&self, request: RpcRequest) -> Result<RpcResponse, TransportError> {
        // One exchange at a time; the pipe carries no framing beyond lines.
        let mut guard = self.pipes.lock().await;
        let pipes = guard.as_mut().ok_or(TransportError::Closed)?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange(pipes, &request))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => exchange(pipes, &request).await,
        }
    }

    async fn notify(&self, notification: RpcNotification) -> Result<(), TransportError> {
        let mut guard = self.pipes.lock().await;
        let pipes = guard.as_mut().ok_or(TransportError::Closed)?;
        Self::write_line(&mut pipes.stdin, serde_json::to_string(&notification)?).await
    }

    async fn close(&self) -> Result<(), TransportError> {
        *self.pipes.lock().await = None;
        if let Some(mut child) = self.child.lock().await.take() {
            child.kill().await?;
        }
        Ok(())
    }
}
