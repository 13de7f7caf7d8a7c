//! Turn and catalog conversion to generateContent.

use serde_json::json;

use lyceum_protocols::{Block, Role, ToolCatalogEntry, ToolChoice, Turn};

use crate::api::{
    Content, FunctionCall, FunctionCallingConfig, FunctionDeclaration, FunctionResponse,
    GeminiTool, Part, ToolConfig,
};

/// System instructions travel outside the content list.
pub fn convert_system(system: &str) -> Option<Content> {
    (!system.is_empty()).then(|| Content {
        role: "user".to_string(),
        parts: vec![Part::text(system)],
    })
}

/// One content per turn; turns with nothing representable are skipped.
pub fn convert_turns(turns: &[Turn]) -> Vec<Content> {
    turns
        .iter()
        .filter_map(|turn| {
            let parts: Vec<Part> = turn.content.iter().filter_map(convert_block).collect();
            if parts.is_empty() {
                return None;
            }
            let role = match turn.role {
                Role::User => "user",
                Role::Agent => "model",
            };
            Some(Content {
                role: role.to_string(),
                parts,
            })
        })
        .collect()
}

/// Thinking without a signature cannot be replayed and is dropped.
fn convert_block(block: &Block) -> Option<Part> {
    let part = match block {
        Block::Text { text } => Part::text(text.as_str()),
        Block::Thinking { text, signature } => Part {
            text: Some(text.clone()),
            thought: true,
            thought_signature: Some(signature.clone()?),
            ..Default::default()
        },
        Block::ToolUse { id, name, input } => Part {
            function_call: Some(FunctionCall {
                id: Some(id.clone()),
                name: name.clone(),
                args: input.clone(),
            }),
            ..Default::default()
        },
        Block::ToolResult {
            tool_use_id,
            tool_name,
            content,
            is_error,
        } => Part {
            function_response: Some(FunctionResponse {
                id: Some(tool_use_id.clone()),
                name: tool_name.clone(),
                response: if *is_error {
                    json!({ "error": content })
                } else {
                    json!({ "output": content })
                },
            }),
            ..Default::default()
        },
    };
    Some(part)
}

pub fn convert_tools(catalog: &[ToolCatalogEntry]) -> Vec<GeminiTool> {
    if catalog.is_empty() {
        return Vec::new();
    }
    vec![GeminiTool {
        function_declarations: catalog
            .iter()
            .map(|t| FunctionDeclaration {
                name: t.qualified_name.clone(),
                description: t.description.clone(),
                parameters_json_schema: t.input_schema.clone(),
            })
            .collect(),
    }]
}

pub fn convert_tool_choice(choice: ToolChoice, has_tools: bool) -> Option<ToolConfig> {
    if !has_tools {
        return None;
    }
    let mode = match choice {
        ToolChoice::Auto => "AUTO",
        ToolChoice::Any => "ANY",
        ToolChoice::None => "NONE",
    };
    Some(ToolConfig {
        function_calling_config: FunctionCallingConfig { mode },
    })
}

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;
