//! Model adapter trait definition.

use async_trait::async_trait;

use super::{ModelRequest, ModelResponse};
use crate::error::ModelError;
use crate::types::{Block, Turn};

/// Core trait for model adapters.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Returns the model name sent to the provider.
    fn model(&self) -> &str;

    /// Run one model call. The response is always an agent turn.
    async fn run(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;

    /// Effective context budget in tokens (context window minus reserved output).
    fn max_tokens(&self) -> u64;

    /// Estimate the token cost of sending a turn.
    fn estimate_tokens(&self, turn: &Turn) -> u64 {
        estimate_blocks(&turn.content)
    }

    /// Estimate the token cost of free text.
    fn estimate_text(&self, text: &str) -> u64 {
        chars_to_tokens(text.chars().count())
    }
}

/// Rough estimate (4 chars per token), rounded up.
pub fn chars_to_tokens(chars: usize) -> u64 {
    chars.div_ceil(4) as u64
}

/// Estimate the token cost of a block list.
pub fn estimate_blocks(blocks: &[Block]) -> u64 {
    let chars: usize = blocks
        .iter()
        .map(|block| match block {
            Block::Text { text } => text.chars().count(),
            Block::Thinking { text, .. } => text.chars().count(),
            Block::ToolUse { id, name, input } => {
                id.len() + name.chars().count() + input.to_string().chars().count()
            }
            Block::ToolResult {
                tool_use_id,
                content,
                ..
            } => tool_use_id.len() + content.chars().count(),
        })
        .sum();
    chars_to_tokens(chars)
}
