//! Conversation log and evolution store errors.

use thiserror::Error;

use crate::types::AgentId;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Position {position} already taken for agent {agent_id}")]
    PositionConflict { agent_id: AgentId, position: i64 },
}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::Serialization(err.to_string())
    }
}
