//! Shape checks adapters run on outbound turns and on their own output.

use crate::error::ModelError;
use crate::types::{Block, Role, Turn};

/// Reject turns no provider can represent.
///
/// - an agent turn carrying tool results
/// - a user turn carrying tool calls
/// - a user turn where free text precedes its tool results
pub fn validate_outbound(turns: &[Turn]) -> Result<(), ModelError> {
    for turn in turns {
        match turn.role {
            Role::Agent => {
                if turn.has_tool_results() {
                    return Err(ModelError::InvalidRequest(format!(
                        "agent turn at position {} carries tool results",
                        turn.position
                    )));
                }
            }
            Role::User => {
                if turn.has_tool_calls() {
                    return Err(ModelError::InvalidRequest(format!(
                        "user turn at position {} carries tool calls",
                        turn.position
                    )));
                }
                let mut seen_text = false;
                for block in &turn.content {
                    match block {
                        Block::Text { .. } => seen_text = true,
                        Block::ToolResult { .. } if seen_text => {
                            return Err(ModelError::InvalidRequest(format!(
                                "user turn at position {} mixes text before tool results",
                                turn.position
                            )));
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    Ok(())
}

/// Check that a parsed model response is a valid agent turn.
pub fn validate_agent_content(content: &[Block]) -> Result<(), ModelError> {
    if content
        .iter()
        .any(|b| matches!(b, Block::ToolResult { .. }))
    {
        return Err(ModelError::MalformedResponse(
            "agent turn contains tool results".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
