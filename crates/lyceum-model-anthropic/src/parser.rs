//! Response parsing.

use lyceum_protocols::{Block, ModelResponse, TokenUsage};

use crate::api::{ApiUsage, ContentBlock, MessagesResponse};
use crate::converter::REDACTED_PREFIX;

/// Normalize a Messages API response into an agent turn.
pub fn parse_response(response: MessagesResponse) -> ModelResponse {
    let content = response
        .content
        .into_iter()
        .filter_map(parse_block)
        .collect();

    let mut parsed = ModelResponse::new(content);
    if let Some(usage) = response.usage {
        parsed = parsed.with_usage(parse_usage(&usage));
    }
    parsed
}

fn parse_block(block: ContentBlock) -> Option<Block> {
    match block {
        ContentBlock::Text { text } => Some(Block::Text { text }),
        ContentBlock::Thinking {
            thinking,
            signature,
        } => Some(Block::Thinking {
            text: thinking,
            signature: Some(signature),
        }),
        ContentBlock::RedactedThinking { data } => Some(Block::Thinking {
            text: "<redacted>".to_string(),
            signature: Some(format!("{}{}", REDACTED_PREFIX, data)),
        }),
        ContentBlock::ToolUse { id, name, input } => Some(Block::ToolUse { id, name, input }),
        // Kept so the agent-turn check can reject it.
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => Some(Block::ToolResult {
            tool_use_id,
            tool_name: String::new(),
            content,
            is_error,
        }),
        ContentBlock::Unsupported => None,
    }
}

/// Input tokens include cache reads and writes; `cached` is the read share.
pub fn parse_usage(usage: &ApiUsage) -> TokenUsage {
    let cache_read = usage.cache_read_input_tokens.unwrap_or(0);
    let cache_write = usage.cache_creation_input_tokens.unwrap_or(0);
    TokenUsage::new(usage.input_tokens + cache_read + cache_write, usage.output_tokens)
        .with_cached(cache_read)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
