//! In-memory conversation log and evolution store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use lyceum_protocols::{
    AgentId, Block, ConversationLog, Evolution, EvolutionStore, LogError, Role, TokenUsage, Turn,
    TurnId,
};

/// Non-durable log, used by tests and dry runs.
pub struct MemoryLog {
    turns: RwLock<HashMap<AgentId, Vec<Turn>>>,
    evolutions: RwLock<HashMap<AgentId, Vec<Evolution>>>,
    next_id: AtomicI64,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            turns: RwLock::new(HashMap::new()),
            evolutions: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationLog for MemoryLog {
    async fn list_turns(&self, agent: AgentId) -> Result<Vec<Turn>, LogError> {
        let turns = self.turns.read().await;
        Ok(turns.get(&agent).cloned().unwrap_or_default())
    }

    async fn append(
        &self,
        agent: AgentId,
        role: Role,
        content: Vec<Block>,
        usage: Option<TokenUsage>,
    ) -> Result<Turn, LogError> {
        let mut turns = self.turns.write().await;
        let entries = turns.entry(agent).or_default();
        let position = entries.last().map(|t| t.position + 1).unwrap_or(0);
        let turn = Turn {
            id: self.next_id(),
            agent_id: agent,
            position,
            role,
            content,
            usage,
            created_at: Utc::now(),
        };
        entries.push(turn.clone());
        Ok(turn)
    }

    async fn find_turn(&self, agent: AgentId, id: TurnId) -> Result<Option<Turn>, LogError> {
        let turns = self.turns.read().await;
        Ok(turns
            .get(&agent)
            .and_then(|entries| entries.iter().find(|t| t.id == id).cloned()))
    }

    async fn token_usage(&self, agent: AgentId) -> Result<TokenUsage, LogError> {
        let turns = self.turns.read().await;
        Ok(turns
            .get(&agent)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|t| t.usage)
                    .fold(TokenUsage::default(), |acc, u| acc + u)
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl EvolutionStore for MemoryLog {
    async fn current(&self, agent: AgentId) -> Result<Option<Evolution>, LogError> {
        let evolutions = self.evolutions.read().await;
        Ok(evolutions.get(&agent).and_then(|e| e.last().cloned()))
    }

    async fn evolve(&self, agent: AgentId, instructions: String) -> Result<Evolution, LogError> {
        let evolution = Evolution {
            id: self.next_id(),
            agent_id: agent,
            instructions,
            created_at: Utc::now(),
        };
        self.evolutions
            .write()
            .await
            .entry(agent)
            .or_default()
            .push(evolution.clone());
        Ok(evolution)
    }
}
