//! Turn and catalog conversion to Chat Completions.

use lyceum_protocols::{Block, Role, ToolCatalogEntry, ToolChoice, Turn};

use crate::api::{ApiMessage, ApiTool, ApiToolCall, FunctionCall, FunctionDef};

/// Build the message list: system first, then each turn in order.
pub fn convert_turns(system: &str, turns: &[Turn]) -> Vec<ApiMessage> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    if !system.is_empty() {
        messages.push(ApiMessage::new("system", system));
    }
    for turn in turns {
        match turn.role {
            Role::User => push_user(&mut messages, turn),
            Role::Agent => push_agent(&mut messages, turn),
        }
    }
    messages
}

/// Tool results become `tool` messages; remaining text becomes one user message.
fn push_user(messages: &mut Vec<ApiMessage>, turn: &Turn) {
    let mut texts = Vec::new();
    for block in &turn.content {
        match block {
            Block::ToolResult {
                tool_use_id,
                content,
                ..
            } => messages.push(ApiMessage {
                role: "tool".to_string(),
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: Some(tool_use_id.clone()),
                refusal: None,
            }),
            Block::Text { text } => texts.push(text.as_str()),
            Block::Thinking { .. } | Block::ToolUse { .. } => {}
        }
    }
    if !texts.is_empty() {
        messages.push(ApiMessage::new("user", texts.join("\n\n")));
    }
}

/// Thinking cannot be replayed through this API and is dropped.
fn push_agent(messages: &mut Vec<ApiMessage>, turn: &Turn) {
    let mut texts = Vec::new();
    let mut calls = Vec::new();
    for block in &turn.content {
        match block {
            Block::Text { text } => texts.push(text.as_str()),
            Block::ToolUse { id, name, input } => calls.push(ApiToolCall {
                id: id.clone(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.clone(),
                    arguments: input.to_string(),
                },
            }),
            Block::Thinking { .. } | Block::ToolResult { .. } => {}
        }
    }
    if texts.is_empty() && calls.is_empty() {
        return;
    }
    messages.push(ApiMessage {
        role: "assistant".to_string(),
        content: (!texts.is_empty()).then(|| texts.join("\n\n")),
        tool_calls: (!calls.is_empty()).then_some(calls),
        tool_call_id: None,
        refusal: None,
    });
}

pub fn convert_tools(catalog: &[ToolCatalogEntry]) -> Vec<ApiTool> {
    catalog
        .iter()
        .map(|t| ApiTool {
            tool_type: "function",
            function: FunctionDef {
                name: t.qualified_name.clone(),
                description: t.description.clone(),
                parameters: t.input_schema.clone(),
            },
        })
        .collect()
}

pub fn convert_tool_choice(choice: ToolChoice, has_tools: bool) -> Option<&'static str> {
    if !has_tools {
        return None;
    }
    Some(match choice {
        ToolChoice::Auto => "auto",
        ToolChoice::Any => "required",
        ToolChoice::None => "none",
    })
}

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;
