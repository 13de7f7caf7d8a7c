//! Response parsing.

use lyceum_protocols::{Block, ModelError, ModelResponse, TokenUsage};

use crate::api::{ApiUsage, ChatResponse};

/// Normalize the first choice into an agent turn.
pub fn parse_response(response: ChatResponse) -> Result<ModelResponse, ModelError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::MalformedResponse("response has no choices".to_string()))?;
    let message = choice.message;

    let mut content = Vec::new();
    if let Some(text) = message.content.filter(|t| !t.is_empty()) {
        content.push(Block::Text { text });
    }
    if let Some(refusal) = message.refusal.filter(|t| !t.is_empty()) {
        content.push(Block::Text { text: refusal });
    }
    for call in message.tool_calls.unwrap_or_default() {
        let input = parse_arguments(&call.function.name, &call.function.arguments)?;
        content.push(Block::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    let mut parsed = ModelResponse::new(content);
    if let Some(usage) = response.usage {
        parsed = parsed.with_usage(parse_usage(&usage));
    }
    Ok(parsed)
}

/// Arguments arrive JSON-encoded; an empty string means no arguments.
fn parse_arguments(tool: &str, arguments: &str) -> Result<serde_json::Value, ModelError> {
    if arguments.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(arguments).map_err(|e| {
        ModelError::MalformedResponse(format!("arguments of {} are not JSON: {}", tool, e))
    })
}

pub fn parse_usage(usage: &ApiUsage) -> TokenUsage {
    TokenUsage {
        input: usage.prompt_tokens,
        output: usage.completion_tokens,
        cached: usage
            .prompt_tokens_details
            .as_ref()
            .map(|d| d.cached_tokens)
            .unwrap_or(0),
        thinking: usage
            .completion_tokens_details
            .as_ref()
            .map(|d| d.reasoning_tokens)
            .unwrap_or(0),
        total: usage.total_tokens,
    }
}
