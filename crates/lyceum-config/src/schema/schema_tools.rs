//! Tool server configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a tool server is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Child process speaking JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

/// One `[[tool_servers]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerConfig {
    /// Namespace of the server's tools.
    pub id: String,

    #[serde(default)]
    pub transport: TransportKind,

    /// Stdio: executable to spawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: HashMap<String, String>,

    /// HTTP: endpoint URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default = "default_tool_timeout")]
    pub timeout_seconds: u64,
}

impl ToolServerConfig {
    /// A stdio server definition.
    pub fn stdio(id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transport: TransportKind::Stdio,
            command: Some(command.into()),
            args: Vec::new(),
            env: HashMap::new(),
            url: None,
            authorization: None,
            headers: HashMap::new(),
            timeout_seconds: default_tool_timeout(),
        }
    }

    /// An HTTP server definition.
    pub fn http(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transport: TransportKind::Http,
            command: None,
            args: Vec::new(),
            env: HashMap::new(),
            url: Some(url.into()),
            authorization: None,
            headers: HashMap::new(),
            timeout_seconds: default_tool_timeout(),
        }
    }

    /// This server as seen by one agent. Stdio children get the experiment
    /// and agent names in their environment; HTTP requests carry them as
    /// headers. Each agent connects its own copy.
    pub fn for_agent(&self, experiment: &str, agent: &str) -> Self {
        let mut scoped = self.clone();
        match scoped.transport {
            TransportKind::Stdio => {
                scoped.env.insert(EXPERIMENT_ENV.to_string(), experiment.to_string());
                scoped.env.insert(AGENT_ENV.to_string(), agent.to_string());
            }
            TransportKind::Http => {
                scoped.headers.insert(EXPERIMENT_HEADER.to_string(), experiment.to_string());
                scoped.headers.insert(AGENT_HEADER.to_string(), agent.to_string());
            }
        }
        scoped
    }
}

pub const EXPERIMENT_ENV: &str = "LYCEUM_EXPERIMENT";
pub const AGENT_ENV: &str = "LYCEUM_AGENT";
pub const EXPERIMENT_HEADER: &str = "x-lyceum-experiment";
pub const AGENT_HEADER: &str = "x-lyceum-agent";

fn default_tool_timeout() -> u64 {
    300
}
