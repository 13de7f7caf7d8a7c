//! Errors surfaced by a tick or a replay.

use thiserror::Error;

use super::{LogError, ModelError};
use crate::types::{AgentId, TurnId};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Tool catalog unavailable from server '{server}': {message}")]
    ToolCatalog { server: String, message: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error(
        "Context overflow: latest loop starting at position {loop_start} \
         needs ~{estimated} tokens, budget is {budget}"
    )]
    ContextOverflow {
        estimated: u64,
        budget: u64,
        loop_start: i64,
    },

    #[error("Conversation log error: {0}")]
    Log(#[from] LogError),

    #[error("Turn not found: {0}")]
    TurnNotFound(TurnId),

    #[error("Turn {0} is not an agent turn")]
    NotAgentTurn(TurnId),

    #[error("Agent {0} already has a live tick")]
    AgentBusy(AgentId),

    #[error("Status unavailable: {0}")]
    Status(String),
}
