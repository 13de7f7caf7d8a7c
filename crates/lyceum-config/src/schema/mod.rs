//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

mod schema_tools;

pub use schema_tools::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

fn lyceum_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lyceum")
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Keyed by provider tag (`anthropic`, `openai`, `gemini`).
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub tool_servers: Vec<ToolServerConfig>,
}

/// SQLite database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    lyceum_home().join("lyceum.db")
}

/// Tick runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum simultaneous tool calls within one tick.
    #[serde(default = "default_tool_concurrency")]
    pub tool_concurrency: usize,

    /// Pause between ticks of one agent in forever mode.
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// Overrides the default status text of a synthetic user turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    /// Attach the in-process instructions self-edit server.
    #[serde(default = "default_true")]
    pub self_edit: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tool_concurrency: default_tool_concurrency(),
            tick_interval_ms: 0,
            status_text: None,
            self_edit: true,
        }
    }
}

fn default_tool_concurrency() -> usize {
    8
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory of the daily rolling log files.
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,

    /// Number of rotated files to keep.
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_log_prefix(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    lyceum_home().join("logs")
}

fn default_log_prefix() -> String {
    "lyceum".to_string()
}

fn default_max_log_files() -> usize {
    30
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Tokens reserved for the model's answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Extended thinking budget; 0 or unset disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,

    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            max_output_tokens: None,
            thinking_budget: None,
            timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    600
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
