//! Model call request and response types.

use serde::{Deserialize, Serialize};

use crate::tool::ToolCatalogEntry;
use crate::types::{Block, TokenUsage, Turn};

/// Request for one model call.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Turns to send, oldest first.
    pub turns: Vec<Turn>,

    /// System instructions for this call.
    pub system: String,

    /// Tool choice mode.
    pub tool_choice: ToolChoice,

    /// Tools the model may call.
    pub catalog: Vec<ToolCatalogEntry>,
}

impl ModelRequest {
    /// Create a new request with `tool_choice = auto` and no tools.
    pub fn new(turns: Vec<Turn>, system: impl Into<String>) -> Self {
        Self {
            turns,
            system: system.into(),
            tool_choice: ToolChoice::Auto,
            catalog: Vec::new(),
        }
    }

    /// Set the tool catalog.
    pub fn with_catalog(mut self, catalog: Vec<ToolCatalogEntry>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the tool choice mode.
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }
}

/// Tool choice mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// Let the model decide.
    #[default]
    Auto,
    /// The model must call some tool.
    Any,
    /// Tools are disabled for this call.
    None,
}

/// A new agent turn produced by the model.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub content: Vec<Block>,
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            content,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
