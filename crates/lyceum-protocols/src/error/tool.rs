//! Tool execution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool {tool} failed: {message}")]
    ExecutionFailed { tool: String, message: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("String edit failed: {0}")]
    StringEdit(String),

    #[error("Tool server error: {0}")]
    Server(String),
}

impl ToolError {
    /// Normalized error code shown to the model.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NotFound(_) => "tool_not_found_error",
            ToolError::ExecutionFailed { .. } | ToolError::Server(_) => "tool_execution_error",
            ToolError::InvalidParameters(_) => "invalid_parameters_error",
            ToolError::StringEdit(_) => "string_edit_error",
        }
    }

    /// Text carried by the error tool result: `Error [<code>]: <message>`.
    pub fn to_result_text(&self) -> String {
        format!("Error [{}]: {}", self.code(), self)
    }
}
