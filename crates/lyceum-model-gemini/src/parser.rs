//! Response parsing.

use lyceum_protocols::{Block, ModelError, ModelResponse, TokenUsage};

use crate::api::{GenerateContentResponse, Part, UsageMetadata};

/// Normalize the first candidate into an agent turn.
pub fn parse_response(response: GenerateContentResponse) -> Result<ModelResponse, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::MalformedResponse("response has no candidates".to_string()))?;

    let content: Vec<Block> = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(parse_part).collect())
        .unwrap_or_default();

    let mut parsed = ModelResponse::new(content);
    if let Some(usage) = response.usage_metadata {
        parsed = parsed.with_usage(parse_usage(&usage));
    }
    Ok(parsed)
}

fn parse_part(part: Part) -> Option<Block> {
    if let Some(call) = part.function_call {
        let input = if call.args.is_null() {
            serde_json::json!({})
        } else {
            call.args
        };
        return Some(Block::ToolUse {
            // Older models leave call ids out.
            id: call
                .id
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple())),
            name: call.name,
            input,
        });
    }
    let text = part.text.filter(|t| !t.is_empty())?;
    if part.thought {
        Some(Block::Thinking {
            text,
            signature: part.thought_signature,
        })
    } else {
        Some(Block::Text { text })
    }
}

pub fn parse_usage(usage: &UsageMetadata) -> TokenUsage {
    TokenUsage {
        input: usage.prompt_token_count,
        output: usage.candidates_token_count,
        cached: usage.cached_content_token_count,
        thinking: usage.thoughts_token_count,
        total: usage.total_token_count,
    }
}
