//! Fakes shared by the runtime tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use lyceum_protocols::{
    AgentProfile, Block, ModelAdapter, ModelError, ModelRequest, ModelResponse, ToolError,
    ToolOutput, ToolServer, ToolSpec,
};

pub fn profile(id: i64) -> AgentProfile {
    AgentProfile {
        id,
        experiment_id: 1,
        name: format!("agent-{}", id),
        provider: "anthropic".to_string(),
        model: "fake".to_string(),
        created_at: Utc::now(),
    }
}

pub fn tool_use(id: &str, name: &str) -> Block {
    Block::ToolUse {
        id: id.to_string(),
        name: name.to_string(),
        input: json!({"arg": id}),
    }
}

pub fn tool_result(id: &str, name: &str) -> Block {
    Block::ToolResult {
        tool_use_id: id.to_string(),
        tool_name: name.to_string(),
        content: "ok".to_string(),
        is_error: false,
    }
}

/// Formatted log output captured for assertions.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events here until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Captured lines emitted under the trace target.
    pub fn trace_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .filter(|line| line.contains("lyceum::trace"))
            .map(str::to_string)
            .collect()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Model that replays a script of responses and records every request.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    requests: Mutex<Vec<ModelRequest>>,
    max_tokens: u64,
}

impl ScriptedModel {
    pub fn new(max_tokens: u64) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            max_tokens,
        }
    }

    pub fn respond(self, content: Vec<Block>) -> Self {
        self.responses
            .lock()
            .push_back(Ok(ModelResponse::new(content)));
        self
    }

    pub fn respond_with(self, response: Result<ModelResponse, ModelError>) -> Self {
        self.responses.lock().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ModelAdapter for ScriptedModel {
    fn id(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn run(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelResponse::new(vec![Block::text("done")])))
    }

    fn max_tokens(&self) -> u64 {
        self.max_tokens
    }
}

/// Server whose tools echo their input; tracks calls and peak concurrency.
pub struct EchoServer {
    id: String,
    tools: Vec<String>,
    fail_listing: bool,
    failing_tool: Option<String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl EchoServer {
    pub fn new(id: &str, tools: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
            fail_listing: false,
            failing_tool: None,
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_tool(mut self, name: &str) -> Self {
        self.failing_tool = Some(name.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ToolServer for EchoServer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        if self.fail_listing {
            return Err(ToolError::Server("listing refused".to_string()));
        }
        Ok(self
            .tools
            .iter()
            .map(|t| ToolSpec::new(t.clone(), format!("echo {}", t)))
            .collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_tool.as_deref() == Some(name) {
            return Err(ToolError::ExecutionFailed {
                tool: name.to_string(),
                message: "backend exploded".to_string(),
            });
        }
        Ok(ToolOutput::success(format!("{}:{}", name, input)))
    }
}
