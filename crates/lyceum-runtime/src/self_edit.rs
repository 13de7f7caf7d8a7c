//! In-process tool server that lets an agent edit its own instructions.
//!
//! Every edit appends a new evolution; the tick reads the latest one when it
//! builds the next system prompt.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;

use lyceum_protocols::{AgentId, EvolutionStore, ToolError, ToolOutput, ToolServer, ToolSpec};

pub const INSTRUCTIONS_SERVER_ID: &str = "instructions";

const UPDATED: &str = "Instructions updated";

const EDIT_DESCRIPTION: &str = "Modify your current operating instructions by substituting a \
text segment. `old_str` must match the current instructions exactly, including whitespace, and \
include enough surrounding context to identify the instance to replace. Set \
`expected_replacements` when the change should affect more than one occurrence; a count \
mismatch is an error. Changes take effect on the next model call.";

#[derive(Debug, Deserialize)]
struct AppendParams {
    new_str: String,
}

#[derive(Debug, Deserialize)]
struct EditParams {
    old_str: String,
    new_str: String,
    #[serde(default = "default_expected_replacements")]
    expected_replacements: usize,
}

fn default_expected_replacements() -> usize {
    1
}

/// Self-edit server bound to one agent.
pub struct InstructionsServer {
    agent: AgentId,
    store: Arc<dyn EvolutionStore>,
    /// Held from reading the current instructions until the edit is stored,
    /// so sibling calls of one tick apply in sequence.
    edit_lock: Mutex<()>,
}

impl InstructionsServer {
    pub fn new(agent: AgentId, store: Arc<dyn EvolutionStore>) -> Self {
        Self {
            agent,
            store,
            edit_lock: Mutex::new(()),
        }
    }

    async fn current(&self) -> Result<String, ToolError> {
        let current = self
            .store
            .current(self.agent)
            .await
            .map_err(|e| ToolError::Server(e.to_string()))?;
        Ok(current.map(|e| e.instructions).unwrap_or_default())
    }

    async fn evolve(&self, tool: &str, instructions: String) -> Result<ToolOutput, ToolError> {
        self.store
            .evolve(self.agent, instructions)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool: tool.to_string(),
                message: e.to_string(),
            })?;
        info!("Agent {} evolved its instructions via {}", self.agent, tool);
        Ok(ToolOutput::success(UPDATED))
    }
}

#[async_trait]
impl ToolServer for InstructionsServer {
    fn id(&self) -> &str {
        INSTRUCTIONS_SERVER_ID
    }

    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        Ok(vec![
            ToolSpec::new(
                "append",
                "Append text to the end of your current operating instructions \
                 (no separator is inserted).",
            )
            .with_input_schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "new_str": {
                        "type": "string",
                        "description": "The string to append."
                    }
                },
                "required": ["new_str"]
            })),
            ToolSpec::new("edit", EDIT_DESCRIPTION).with_input_schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "old_str": {
                        "type": "string",
                        "description": "The exact text to replace."
                    },
                    "new_str": {
                        "type": "string",
                        "description": "The text that replaces `old_str`."
                    },
                    "expected_replacements": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of occurrences to replace. Defaults to 1."
                    }
                },
                "required": ["old_str", "new_str"]
            })),
        ])
    }

    async fn call_tool(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        match name {
            "append" => {
                let params: AppendParams = serde_json::from_value(input)
                    .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
                let _guard = self.edit_lock.lock().await;
                let current = self.current().await?;
                self.evolve(name, current + &params.new_str).await
            }
            "edit" => {
                let params: EditParams = serde_json::from_value(input)
                    .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
                let _guard = self.edit_lock.lock().await;
                let current = self.current().await?;
                let updated = string_edit(
                    &current,
                    &params.old_str,
                    &params.new_str,
                    params.expected_replacements,
                )?;
                self.evolve(name, updated).await
            }
            other => Err(ToolError::NotFound(other.to_string())),
        }
    }
}

/// Replace every occurrence of `old` with `new`, requiring an exact count.
pub fn string_edit(
    content: &str,
    old: &str,
    new: &str,
    expected_replacements: usize,
) -> Result<String, ToolError> {
    if expected_replacements == 0 {
        return Err(ToolError::InvalidParameters(
            "expected_replacements must be at least 1".to_string(),
        ));
    }
    if old.is_empty() {
        return Err(ToolError::StringEdit(
            "String to replace cannot be empty".to_string(),
        ));
    }

    let occurrences = content.matches(old).count();
    if occurrences == 0 {
        return Err(ToolError::StringEdit(
            "String to replace not found in content to edit".to_string(),
        ));
    }
    if occurrences != expected_replacements {
        return Err(ToolError::StringEdit(format!(
            "Expected {} replacements, but found {} occurrences",
            expected_replacements, occurrences
        )));
    }

    Ok(content.replace(old, new))
}

#[cfg(test)]
#[path = "self_edit_tests.rs"]
mod tests;
