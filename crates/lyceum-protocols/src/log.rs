//! Storage contracts: the conversation log and the instructions history.

use async_trait::async_trait;

use crate::error::LogError;
use crate::types::{AgentId, Block, Evolution, Role, TokenUsage, Turn, TurnId};

/// Append-only, per-agent sequence of position-ordered turns.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// All turns of an agent, ordered by position.
    async fn list_turns(&self, agent: AgentId) -> Result<Vec<Turn>, LogError>;

    /// Append a turn at `last position + 1`, assigned atomically with the insert.
    async fn append(
        &self,
        agent: AgentId,
        role: Role,
        content: Vec<Block>,
        usage: Option<TokenUsage>,
    ) -> Result<Turn, LogError>;

    /// Look up one turn of an agent by id.
    async fn find_turn(&self, agent: AgentId, id: TurnId) -> Result<Option<Turn>, LogError>;

    /// Cumulative usage recorded for an agent.
    async fn token_usage(&self, agent: AgentId) -> Result<TokenUsage, LogError>;
}

/// Append-only history of an agent's operating instructions.
#[async_trait]
pub trait EvolutionStore: Send + Sync {
    /// The latest evolution, if any.
    async fn current(&self, agent: AgentId) -> Result<Option<Evolution>, LogError>;

    /// Record a new version of the instructions.
    async fn evolve(&self, agent: AgentId, instructions: String) -> Result<Evolution, LogError>;
}
