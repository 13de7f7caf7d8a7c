//! Turn and catalog conversion to the Messages API.

use lyceum_protocols::{Block, Role, ToolCatalogEntry, ToolChoice, Turn};

use crate::api::{ApiMessage, ApiTool, ApiToolChoice, ContentBlock};

/// Signature prefix marking a redacted thinking block's opaque payload.
pub(crate) const REDACTED_PREFIX: &str = "redacted:";

/// Convert turns to API messages. Turns left empty after conversion are dropped.
pub fn convert_turns(turns: &[Turn]) -> Vec<ApiMessage> {
    turns
        .iter()
        .filter_map(|turn| {
            let content: Vec<ContentBlock> =
                turn.content.iter().filter_map(convert_block).collect();
            if content.is_empty() {
                return None;
            }
            Some(ApiMessage {
                role: match turn.role {
                    Role::User => "user".to_string(),
                    Role::Agent => "assistant".to_string(),
                },
                content,
            })
        })
        .collect()
}

/// Convert one block. Unsigned thinking cannot be replayed and is dropped.
pub fn convert_block(block: &Block) -> Option<ContentBlock> {
    match block {
        Block::Text { text } => Some(ContentBlock::Text { text: text.clone() }),
        Block::Thinking { text, signature } => match signature {
            Some(sig) => match sig.strip_prefix(REDACTED_PREFIX) {
                Some(data) => Some(ContentBlock::RedactedThinking {
                    data: data.to_string(),
                }),
                None => Some(ContentBlock::Thinking {
                    thinking: text.clone(),
                    signature: sig.clone(),
                }),
            },
            None => None,
        },
        Block::ToolUse { id, name, input } => Some(ContentBlock::ToolUse {
            id: id.clone(),
            name: name.clone(),
            input: input.clone(),
        }),
        Block::ToolResult {
            tool_use_id,
            content,
            is_error,
            ..
        } => Some(ContentBlock::ToolResult {
            tool_use_id: tool_use_id.clone(),
            content: content.clone(),
            is_error: *is_error,
        }),
    }
}

pub fn convert_tools(catalog: &[ToolCatalogEntry]) -> Vec<ApiTool> {
    catalog
        .iter()
        .map(|t| ApiTool {
            name: t.qualified_name.clone(),
            description: t.description.clone(),
            input_schema: t.input_schema.clone(),
        })
        .collect()
}

/// Tool choice is only meaningful when tools are sent.
pub fn convert_tool_choice(choice: ToolChoice, has_tools: bool) -> Option<ApiToolChoice> {
    if !has_tools {
        return None;
    }
    let choice_type = match choice {
        ToolChoice::Auto => "auto",
        ToolChoice::Any => "any",
        ToolChoice::None => "none",
    };
    Some(ApiToolChoice { choice_type })
}

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;
